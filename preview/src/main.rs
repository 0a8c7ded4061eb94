//! Console preview for myrtio-ac-dimmer
//!
//! Drives dimmers against a simulated time-base and draws one half-cycle of
//! every generator output per step: `#` while the load conducts, `_` while it
//! is off.
//!
//! Usage: `myrtio-ac-dimmer-preview [manual|task]`

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration as StdDuration;

use embassy_futures::join::join;
use embassy_futures::{block_on, yield_now};
use myrtio_ac_dimmer::{
    DUTY_MAX, Dimmer, DimmerChannel, DimmerConfig, DimmerError, GroupId, OutputLevel, Pin,
    Polarity, ResourceAllocator, SharedAllocator, TaskDimmer, Timebase, TimerConfig,
};

/// Characters drawn per half-cycle
const COLUMNS: u16 = 50;

/// Power step of the ramps
const RAMP_STEP: f32 = 0.05;

/// Delay between frames
const FRAME_DELAY: StdDuration = StdDuration::from_millis(50);

const DIMMER_0_GEN_PIN: Pin = 2;
const DIMMER_1_GEN_PIN: Pin = 4;
const SYNC_PIN: Pin = 5;

#[derive(Debug, Clone, Copy)]
struct Output {
    pin: Pin,
    compare: u16,
    polarity: Polarity,
    forced: OutputLevel,
}

impl Output {
    fn level_at(&self, tick: u16) -> OutputLevel {
        match self.forced {
            OutputLevel::Released if tick < self.compare => self.polarity.on_zero(),
            OutputLevel::Released => self.polarity.on_compare(),
            forced => forced,
        }
    }
}

/// Simulated time-base: one timer per output
#[derive(Clone, Default)]
struct ConsoleTimebase {
    outputs: Rc<RefCell<Vec<Output>>>,
}

impl ConsoleTimebase {
    fn draw(&self) {
        for output in self.outputs.borrow().iter() {
            let wave: String = (0..COLUMNS)
                .map(|column| match output.level_at(column * DUTY_MAX / COLUMNS) {
                    OutputLevel::High => '#',
                    _ => '_',
                })
                .collect();
            println!("  gpio{:<2} |{}|", output.pin, wave);
        }
        println!();
        std::thread::sleep(FRAME_DELAY);
    }
}

impl Timebase for ConsoleTimebase {
    type Timer = usize;
    type Generator = usize;
    type Error = core::convert::Infallible;

    fn allocate_timer(&mut self, _config: &TimerConfig) -> Result<usize, Self::Error> {
        let mut outputs = self.outputs.borrow_mut();
        outputs.push(Output {
            pin: 0,
            compare: 0,
            polarity: Polarity::default(),
            forced: OutputLevel::Low,
        });
        Ok(outputs.len() - 1)
    }

    fn bind_output(
        &mut self,
        timer: &mut usize,
        pin: Pin,
        polarity: Polarity,
    ) -> Result<usize, Self::Error> {
        let output = &mut self.outputs.borrow_mut()[*timer];
        output.pin = pin;
        output.polarity = polarity;
        Ok(*timer)
    }

    fn set_compare(&mut self, timer: &mut usize, ticks: u16) -> Result<(), Self::Error> {
        self.outputs.borrow_mut()[*timer].compare = ticks;
        Ok(())
    }

    fn set_resolution(&mut self, _timer: &mut usize, _resolution_hz: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn force_level(&mut self, generator: &mut usize, level: OutputLevel) -> Result<(), Self::Error> {
        self.outputs.borrow_mut()[*generator].forced = level;
        Ok(())
    }

    fn bind_sync_source(
        &mut self,
        _timer: &mut usize,
        _group: GroupId,
        _sync_pin: Pin,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enable(&mut self, _timer: &mut usize) -> Result<(), Self::Error> {
        Ok(())
    }

    fn disable(&mut self, _timer: &mut usize) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn ramp() -> impl Iterator<Item = f32> {
    let steps = (1.0 / RAMP_STEP) as i32;
    (0..=steps)
        .chain((0..steps).rev())
        .map(|step| step as f32 * RAMP_STEP)
}

/// Two dimmers on one zero-cross line, one ramped, one fixed
fn manual_control() -> Result<(), DimmerError<core::convert::Infallible>> {
    println!("Manual dimmer preview");
    let timebase = ConsoleTimebase::default();
    let mut allocator: ResourceAllocator = ResourceAllocator::new();

    let mut dimmer_0 = Dimmer::create(
        &mut allocator,
        timebase.clone(),
        DimmerConfig::new(DIMMER_0_GEN_PIN, SYNC_PIN),
    )?;
    let mut dimmer_1 = Dimmer::create(
        &mut allocator,
        timebase.clone(),
        DimmerConfig::new(DIMMER_1_GEN_PIN, SYNC_PIN).with_polarity(Polarity::ConductFromZero),
    )?;
    dimmer_1.set_duty(250)?;
    dimmer_0.start()?;
    dimmer_1.start()?;

    for power in ramp() {
        dimmer_0.set_power(power)?;
        println!(
            "power {:.2} -> duty {:4} ({:?} conducting)",
            dimmer_0.power(),
            dimmer_0.duty(),
            dimmer_0.conduction_time()
        );
        timebase.draw();
    }

    dimmer_0.stop()?;
    dimmer_0.delete()?;
    dimmer_1.delete()?;
    timebase.draw();
    Ok(())
}

/// The same ramp, posted to control tasks
fn task_control() -> Result<(), DimmerError<core::convert::Infallible>> {
    println!("Task dimmer preview");
    let timebase = ConsoleTimebase::default();
    let allocator: SharedAllocator = SharedAllocator::new();
    let channel_0 = DimmerChannel::new();
    let channel_1 = DimmerChannel::new();

    let (mut dimmer_0, task_0) = TaskDimmer::new(
        &channel_0,
        &allocator,
        timebase.clone(),
        DimmerConfig::new(DIMMER_0_GEN_PIN, SYNC_PIN),
    );
    let (mut dimmer_1, task_1) = TaskDimmer::new(
        &channel_1,
        &allocator,
        timebase.clone(),
        DimmerConfig::new(DIMMER_1_GEN_PIN, SYNC_PIN),
    );
    dimmer_1.set_duty(500);

    let controller = async {
        for power in ramp() {
            dimmer_0.set_power(power);
            yield_now().await;
            println!("requested power {:.2}", dimmer_0.power());
            timebase.draw();
        }
        dimmer_0.delete();
        dimmer_1.delete();
    };

    let ((result_0, result_1), ()) = block_on(join(join(task_0.run(), task_1.run()), controller));
    result_0?;
    result_1?;
    timebase.draw();
    Ok(())
}

fn main() {
    let mode = std::env::args().nth(1);
    let result = match mode.as_deref() {
        Some("manual") => manual_control(),
        Some("task") => task_control(),
        _ => manual_control().and_then(|()| task_control()),
    };
    if let Err(error) = result {
        eprintln!("preview failed: {}", error);
        std::process::exit(1);
    }
}
