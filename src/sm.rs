//! Per-state-machine architectural state: the registers an instruction word
//! actually touches, plus the bookkeeping the scheduler needs to decide
//! whether to decode a new instruction this cycle (delay, stall,
//! pending-exec).
//!
//! This is the single owner of a state machine's state, in the same spirit
//! as a canonical CPU-state struct: every field lives here once, and the
//! executor (`exec/`) takes `&mut StateMachine` rather than threading
//! individual registers through call sites.

use crate::config::SmConfig;
use crate::debug::SmDebugInfo;
use crate::fifo::Fifo;

#[derive(Debug, Clone, Default)]
pub struct PendingExec {
    pub instr: u16,
    pub valid: bool,
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    pub x: u32,
    pub y: u32,
    pub isr: u32,
    pub osr: u32,
    pub isr_count: u8,
    pub osr_count: u8,
    pub pc: u8,
    pub delay: u8,
    pub stalled: bool,
    pub enabled: bool,
    pub pending_exec: PendingExec,
    pub config: SmConfig,
    pub tx_fifo: Fifo,
    pub rx_fifo: Fifo,
    pub debug: SmDebugInfo,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        StateMachine {
            x: 0,
            y: 0,
            isr: 0,
            // OSR-count = 32 is the "OSR is empty, a refill is due" sentinel;
            // ISR-count = 0 is the symmetric "ISR holds nothing yet" value.
            osr: 0,
            isr_count: 0,
            osr_count: 32,
            pc: 0,
            delay: 0,
            stalled: false,
            enabled: false,
            pending_exec: PendingExec::default(),
            config: SmConfig::default(),
            tx_fifo: Fifo::new(),
            rx_fifo: Fifo::new(),
            debug: SmDebugInfo::default(),
        }
    }
}
