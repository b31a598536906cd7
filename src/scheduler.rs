//! The single-step scheduler: advances every enabled state machine across
//! all three blocks by exactly one cycle, in the fixed order block 0 SM
//! 0..3, block 1 SM 0..3, block 2 SM 0..3, then finalises every block's
//! pending IRQ masks, then bumps the cycle counter.
//!
//! This module owns none of the per-instruction semantics - [`crate::exec`]
//! does that - it only owns the delay-counter gate, the pending-exec
//! fetch, and the PC-wrap/delay-arm bookkeeping that follows an
//! instruction's side effects.

use crate::exec::{self, delay_field};
use crate::system::PioSystem;
use crate::{NUM_PIO_BLOCKS, NUM_SMS_PER_BLOCK};

pub(crate) fn step_cycle(sys: &mut PioSystem) {
    for block in 0..NUM_PIO_BLOCKS {
        for sm in 0..NUM_SMS_PER_BLOCK {
            if sys.blocks[block].sm[sm].enabled {
                step_sm(sys, block, sm);
            }
        }
    }
    for block in 0..NUM_PIO_BLOCKS {
        sys.blocks[block].irq.finalize();
        log::debug!("block {block} irq finalized: flags={:#04x}", sys.blocks[block].irq.flags());
    }
    sys.bump_cycle_count();
}

fn step_sm(sys: &mut PioSystem, block: usize, sm: usize) {
    {
        let s = &mut sys.blocks[block].sm[sm];
        if s.delay > 0 {
            s.delay -= 1;
            return;
        }
    }

    let instr = {
        let s = &mut sys.blocks[block].sm[sm];
        if s.pending_exec.valid {
            s.pending_exec.valid = false;
            Some(s.pending_exec.instr)
        } else {
            None
        }
    };
    let instr = instr.unwrap_or_else(|| sys.blocks[block].instr_mem[sys.blocks[block].sm[sm].pc as usize]);

    log::trace!(
        "block {block} sm {sm}: pc={} instr={instr:#06x} x={:#x} y={:#x} isr={:#x} osr={:#x} tx_depth={} rx_depth={}",
        sys.blocks[block].sm[sm].pc,
        sys.blocks[block].sm[sm].x,
        sys.blocks[block].sm[sm].y,
        sys.blocks[block].sm[sm].isr,
        sys.blocks[block].sm[sm].osr,
        sys.blocks[block].sm[sm].tx_fifo.depth(),
        sys.blocks[block].sm[sm].rx_fifo.depth(),
    );

    let outcome = exec::execute(sys, block, sm, instr);

    let s = &mut sys.blocks[block].sm[sm];
    if s.stalled {
        return;
    }

    if !outcome.pc_consumed {
        let wrap_top = s.config.wrap_top();
        let wrap_bottom = s.config.wrap_bottom();
        s.pc = if s.pc == wrap_top { wrap_bottom } else { s.pc + 1 };
    }

    if !outcome.suppress_delay {
        s.delay = delay_field(instr);
    }
}
