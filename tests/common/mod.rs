#![allow(dead_code)]

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use myrtio_ac_dimmer::{GroupId, OutputLevel, Pin, Polarity, Timebase, TimerConfig};

/// Hardware call a [`MockTimebase`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    AllocateTimer,
    BindOutput,
    SetCompare,
    SetResolution,
    ForceLevel,
    BindSync,
    Enable,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFault(pub Step);

#[derive(Debug)]
pub struct TimerRecord {
    pub config: TimerConfig,
    pub compares: Vec<u16>,
    pub resolutions: Vec<u32>,
    pub sync: Option<(GroupId, Pin)>,
    pub enabled: bool,
}

#[derive(Debug)]
pub struct GeneratorRecord {
    pub pin: Pin,
    pub timer: usize,
    pub polarity: Polarity,
    pub levels: Vec<OutputLevel>,
}

#[derive(Debug, Default)]
pub struct MockHardware {
    pub timers: Vec<TimerRecord>,
    pub generators: Vec<GeneratorRecord>,
    pub fail_on: Option<Step>,
}

/// Timebase recording every call, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MockTimebase {
    hardware: Rc<RefCell<MockHardware>>,
}

impl MockTimebase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(step: Step) -> Self {
        let mock = Self::new();
        mock.hardware.borrow_mut().fail_on = Some(step);
        mock
    }

    pub fn hardware(&self) -> Ref<'_, MockHardware> {
        self.hardware.borrow()
    }

    pub fn timer_count(&self) -> usize {
        self.hardware().timers.len()
    }

    pub fn compares(&self, timer: usize) -> Vec<u16> {
        self.hardware().timers[timer].compares.clone()
    }

    pub fn levels(&self, generator: usize) -> Vec<OutputLevel> {
        self.hardware().generators[generator].levels.clone()
    }

    pub fn last_level(&self, generator: usize) -> Option<OutputLevel> {
        self.hardware().generators[generator].levels.last().copied()
    }

    pub fn is_enabled(&self, timer: usize) -> bool {
        self.hardware().timers[timer].enabled
    }

    fn check(&self, step: Step) -> Result<(), MockFault> {
        if self.hardware.borrow().fail_on == Some(step) {
            return Err(MockFault(step));
        }
        Ok(())
    }
}

impl Timebase for MockTimebase {
    type Timer = usize;
    type Generator = usize;
    type Error = MockFault;

    fn allocate_timer(&mut self, config: &TimerConfig) -> Result<usize, MockFault> {
        self.check(Step::AllocateTimer)?;
        let mut hardware = self.hardware.borrow_mut();
        hardware.timers.push(TimerRecord {
            config: *config,
            compares: Vec::new(),
            resolutions: Vec::new(),
            sync: None,
            enabled: false,
        });
        Ok(hardware.timers.len() - 1)
    }

    fn bind_output(
        &mut self,
        timer: &mut usize,
        pin: Pin,
        polarity: Polarity,
    ) -> Result<usize, MockFault> {
        self.check(Step::BindOutput)?;
        let mut hardware = self.hardware.borrow_mut();
        hardware.generators.push(GeneratorRecord {
            pin,
            timer: *timer,
            polarity,
            levels: Vec::new(),
        });
        Ok(hardware.generators.len() - 1)
    }

    fn set_compare(&mut self, timer: &mut usize, ticks: u16) -> Result<(), MockFault> {
        self.check(Step::SetCompare)?;
        self.hardware.borrow_mut().timers[*timer].compares.push(ticks);
        Ok(())
    }

    fn set_resolution(&mut self, timer: &mut usize, resolution_hz: u32) -> Result<(), MockFault> {
        self.check(Step::SetResolution)?;
        self.hardware.borrow_mut().timers[*timer]
            .resolutions
            .push(resolution_hz);
        Ok(())
    }

    fn force_level(&mut self, generator: &mut usize, level: OutputLevel) -> Result<(), MockFault> {
        self.check(Step::ForceLevel)?;
        self.hardware.borrow_mut().generators[*generator]
            .levels
            .push(level);
        Ok(())
    }

    fn bind_sync_source(
        &mut self,
        timer: &mut usize,
        group: GroupId,
        sync_pin: Pin,
    ) -> Result<(), MockFault> {
        self.check(Step::BindSync)?;
        self.hardware.borrow_mut().timers[*timer].sync = Some((group, sync_pin));
        Ok(())
    }

    fn enable(&mut self, timer: &mut usize) -> Result<(), MockFault> {
        self.check(Step::Enable)?;
        self.hardware.borrow_mut().timers[*timer].enabled = true;
        Ok(())
    }

    fn disable(&mut self, timer: &mut usize) -> Result<(), MockFault> {
        self.check(Step::Disable)?;
        self.hardware.borrow_mut().timers[*timer].enabled = false;
        Ok(())
    }
}
