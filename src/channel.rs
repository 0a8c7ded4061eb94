//! Single-slot notification channel for `no_std` environments.
//!
//! Built on `embassy_sync::signal::Signal`: a send overwrites a value the
//! receiver has not consumed yet, so the receiver only ever observes the most
//! recent command. A [`DimmerCommand::Shutdown`] is never overwritten: once
//! posted, later sends are refused. Safe to send from tasks and interrupt
//! handlers.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::error::{TryReceiveError, TrySendError};

/// Command delivered to a dimmer control task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerCommand {
    /// Apply a duty in ticks
    SetDuty(u16),
    /// Delete the dimmer and end the task
    Shutdown,
}

/// Outcome of a successful send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The slot was empty
    Posted,
    /// An unconsumed command was overwritten
    Replaced,
}

/// Single-slot, overwrite-on-send channel.
pub struct DimmerChannel {
    signal: Signal<CriticalSectionRawMutex, DimmerCommand>,
    closed: AtomicBool,
    shutdown: AtomicBool,
}

impl DimmerChannel {
    /// Create a new empty channel.
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            closed: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Get a sender handle for this channel.
    ///
    /// Multiple senders can coexist; the last send wins.
    pub const fn sender(&self) -> Sender<'_> {
        Sender { channel: self }
    }

    /// Get a receiver handle for this channel.
    ///
    /// Only one task should receive from a channel.
    pub const fn receiver(&self) -> Receiver<'_> {
        Receiver { channel: self }
    }

    /// Check if the receiving task has gone away
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Check if a shutdown has been posted
    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Check if a command is waiting to be consumed
    pub fn has_pending(&self) -> bool {
        self.signal.signaled()
    }

    fn send(&self, command: DimmerCommand) -> Result<Delivery, TrySendError<DimmerCommand>> {
        // The slot check and the write must not interleave with a take
        critical_section::with(|_| {
            if self.is_closed() || self.is_shutting_down() {
                return Err(TrySendError(command));
            }
            if command == DimmerCommand::Shutdown {
                self.shutdown.store(true, Ordering::Release);
            }
            let delivery = if self.signal.signaled() {
                Delivery::Replaced
            } else {
                Delivery::Posted
            };
            self.signal.signal(command);
            Ok(delivery)
        })
    }
}

impl Default for DimmerChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`DimmerChannel`].
#[derive(Clone, Copy)]
pub struct Sender<'a> {
    channel: &'a DimmerChannel,
}

impl Sender<'_> {
    /// Post a command, replacing any unconsumed one.
    ///
    /// Returns `Err(TrySendError(command))` if the channel is closed or a
    /// shutdown is already posted.
    pub fn send(&self, command: DimmerCommand) -> Result<Delivery, TrySendError<DimmerCommand>> {
        self.channel.send(command)
    }
}

/// A receiver handle for a [`DimmerChannel`].
#[derive(Clone, Copy)]
pub struct Receiver<'a> {
    channel: &'a DimmerChannel,
}

impl Receiver<'_> {
    /// Wait for the next command.
    ///
    /// Once a shutdown is posted, every receive yields it.
    pub async fn receive(&self) -> DimmerCommand {
        if self.channel.is_shutting_down() {
            self.channel.signal.reset();
            return DimmerCommand::Shutdown;
        }
        self.channel.signal.wait().await
    }

    /// Take the pending command without waiting.
    ///
    /// Returns `Err(TryReceiveError)` if the slot is empty and no shutdown
    /// was posted.
    pub fn try_receive(&self) -> Result<DimmerCommand, TryReceiveError> {
        if self.channel.is_shutting_down() {
            self.channel.signal.reset();
            return Ok(DimmerCommand::Shutdown);
        }
        self.channel.signal.try_take().ok_or(TryReceiveError)
    }

    /// Mark the channel as closed; later sends fail.
    pub fn close(&self) {
        self.channel.closed.store(true, Ordering::Release);
    }
}
