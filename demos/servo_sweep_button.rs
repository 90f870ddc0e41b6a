#![allow(missing_docs)]
#![no_std]
#![no_main]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_time::{Delay, Timer};
use servo_blocks::{
    Result,
    hub::{PinId, ServoHub},
    pwm::ChannelBank,
    rp,
    stop::PressedTo,
    sweep::Sweep,
};
use {defmt::info, defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let mut stop_button = rp::stop_button(p.PIN_13, PressedTo::Ground);

    // rule: slice = (gpio/2) % 8; GPIO11 -> 5, GPIO12 -> 6
    let bank = ChannelBank::<_, 2>::new()
        .with(PinId(11), rp::servo_pwm(p.PIN_11, p.PWM_SLICE5))?
        .with(PinId(12), rp::servo_pwm(p.PIN_12, p.PWM_SLICE6))?;
    let mut hub: ServoHub<_, 2> = ServoHub::new(bank);

    let arm = hub.connect(PinId(11))?;
    let wrist = hub.connect(PinId(12))?;

    hub.set_angle(wrist, 90.0)?;
    hub.set_angle(arm, 180.0)?;
    // Give it a reasonable time to get there.
    Timer::after_millis(400).await;

    let mut delay = Delay;
    loop {
        info!("Sweeping GPIO 11; press the button on GPIO 13 to stop early");
        let outcome = hub
            .sweep_async(arm, Sweep::new(0.0, 180.0, 5.0, 3), &mut delay, &mut stop_button)
            .await?;
        info!("Sweep ended: {}", outcome);

        hub.stop(arm)?;
        Timer::after_secs(2).await;
    }
}
