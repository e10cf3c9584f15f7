use embedded_time::duration::{Extensions, Microseconds};
use embedded_time::timer::param::{OneShot, Running};
use embedded_time::{Clock, Timer};

#[derive(Debug, PartialEq)]
pub enum TimeoutError {
    /// A deadline was requested, but no clock is available
    MissingClock,
    TimerStartFailed,
    TimerError,
}

/// Optional one shot timer. Never expires if no clock or a zero duration is given.
#[derive(Debug)]
pub struct Timeout<'a, C: Clock> {
    timer: Option<Timer<'a, OneShot, Running, C, Microseconds>>,
}

impl<'a, C: Clock> Timeout<'a, C> {
    pub fn new(clock: Option<&'a C>, duration: Microseconds) -> Result<Timeout<'a, C>, TimeoutError> {
        match clock {
            Some(clock) if duration != 0.microseconds() => Self::start(clock, duration),
            _ => Ok(Self::unbounded()),
        }
    }

    /// Like [Timeout::new], but a missing clock is an error instead of an unlimited timeout
    pub fn deadline(clock: Option<&'a C>, duration: Microseconds) -> Result<Timeout<'a, C>, TimeoutError> {
        if clock.is_none() {
            return Err(TimeoutError::MissingClock);
        }

        Self::new(clock, duration)
    }

    /// Timeout which never expires
    pub fn unbounded() -> Self {
        Self { timer: None }
    }

    fn start(clock: &'a C, duration: Microseconds) -> Result<Timeout<'a, C>, TimeoutError> {
        match clock.new_timer(duration).start() {
            Ok(timer) => Ok(Self { timer: Some(timer) }),
            Err(_) => Err(TimeoutError::TimerStartFailed),
        }
    }

    pub fn expired(&self) -> Result<bool, TimeoutError> {
        match &self.timer {
            None => Ok(false),
            Some(timer) => timer.is_expired().map_err(|_| TimeoutError::TimerError),
        }
    }
}
