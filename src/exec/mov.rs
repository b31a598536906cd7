//! MOV: bits 7..5 select the destination, bits 4..3 the operation, bits
//! 2..0 the source. Source `0b100` and operation `0b11` are reserved
//! encodings and are rejected at dispatch.

use crate::exec::common::{read_pins_value, resolve_irq_target, write_pindirs_value, write_pins_value};
use crate::exec::ExecOutcome;
use crate::system::PioSystem;

const SRC_PINS: u8 = 0b000;
const SRC_X: u8 = 0b001;
const SRC_Y: u8 = 0b010;
const SRC_NULL: u8 = 0b011;
const SRC_STATUS: u8 = 0b101;
const SRC_ISR: u8 = 0b110;
const SRC_OSR: u8 = 0b111;

const OP_NONE: u8 = 0b00;
const OP_INVERT: u8 = 0b01;
const OP_BITREV: u8 = 0b10;

const DEST_PINS: u8 = 0b000;
const DEST_X: u8 = 0b001;
const DEST_Y: u8 = 0b010;
const DEST_PINDIRS: u8 = 0b011;
const DEST_EXEC: u8 = 0b100;
const DEST_PC: u8 = 0b101;
const DEST_ISR: u8 = 0b110;
const DEST_OSR: u8 = 0b111;

pub(crate) fn exec(sys: &mut PioSystem, block: usize, sm: usize, instr: u16) -> ExecOutcome {
    let dest = ((instr >> 5) & 0b111) as u8;
    let op = ((instr >> 3) & 0b11) as u8;
    let source = (instr & 0b111) as u8;
    assert!(op != 0b11, "reserved MOV operation encoding 0b11");

    let raw = match source {
        SRC_PINS => {
            let gpio_base = sys.blocks[block].gpio_base;
            let in_base = sys.blocks[block].sm[sm].config.in_base();
            let in_count = sys.blocks[block].sm[sm].config.in_count();
            read_pins_value(&sys.gpio, gpio_base, in_base, in_count)
        }
        SRC_X => sys.blocks[block].sm[sm].x,
        SRC_Y => sys.blocks[block].sm[sm].y,
        SRC_NULL => 0,
        SRC_STATUS => status_value(sys, block, sm),
        SRC_ISR => sys.blocks[block].sm[sm].isr,
        SRC_OSR => sys.blocks[block].sm[sm].osr,
        other => panic!("reserved MOV source encoding {other:#05b}"),
    };

    let value = match op {
        OP_NONE => raw,
        OP_INVERT => !raw,
        OP_BITREV => raw.reverse_bits(),
        _ => unreachable!("reserved operation rejected above"),
    };

    match dest {
        DEST_PINS => {
            let gpio_base = sys.blocks[block].gpio_base;
            let out_base = sys.blocks[block].sm[sm].config.out_base();
            let out_count = sys.blocks[block].sm[sm].config.out_count();
            write_pins_value(&mut sys.gpio, gpio_base, out_base, out_count, value);
            ExecOutcome::default()
        }
        DEST_X => {
            sys.blocks[block].sm[sm].x = value;
            ExecOutcome::default()
        }
        DEST_Y => {
            sys.blocks[block].sm[sm].y = value;
            ExecOutcome::default()
        }
        DEST_PINDIRS => {
            let gpio_base = sys.blocks[block].gpio_base;
            let out_base = sys.blocks[block].sm[sm].config.out_base();
            let out_count = sys.blocks[block].sm[sm].config.out_count();
            write_pindirs_value(&mut sys.gpio, gpio_base, out_base, out_count, value);
            ExecOutcome::default()
        }
        DEST_EXEC => {
            sys.blocks[block].sm[sm].pending_exec.instr = value as u16;
            sys.blocks[block].sm[sm].pending_exec.valid = true;
            ExecOutcome { pc_consumed: false, suppress_delay: true }
        }
        DEST_PC => {
            sys.blocks[block].sm[sm].pc = value as u8;
            ExecOutcome { pc_consumed: true, suppress_delay: false }
        }
        DEST_ISR => {
            sys.blocks[block].sm[sm].isr = value;
            sys.blocks[block].sm[sm].isr_count = 0;
            ExecOutcome::default()
        }
        DEST_OSR => {
            sys.blocks[block].sm[sm].osr = value;
            sys.blocks[block].sm[sm].osr_count = 0;
            ExecOutcome::default()
        }
        _ => unreachable!("3-bit destination"),
    }
}

/// `status_n`'s low three bits pick an IRQ flag and bits 4..3 pick a block
/// target, exactly like the IRQ/WAIT-IRQ block selector, only when
/// `status_sel` addresses an IRQ rather than a FIFO depth.
fn status_value(sys: &PioSystem, block: usize, sm: usize) -> u32 {
    let cfg = &sys.blocks[block].sm[sm].config;
    let status_n = cfg.status_n();
    match cfg.status_sel() {
        0b00 => bool_to_mask((sys.blocks[block].sm[sm].tx_fifo.depth() as u8) < status_n),
        0b01 => bool_to_mask((sys.blocks[block].sm[sm].rx_fifo.depth() as u8) < status_n),
        0b10 => {
            let selector = (status_n >> 3) & 0b11;
            let index = status_n & 0b111;
            let (tb, ti) = resolve_irq_target(block, selector, index, sm);
            bool_to_mask(sys.blocks[tb].irq.is_set(ti as usize))
        }
        other => panic!("reserved MOV STATUS select {other:#04b}"),
    }
}

fn bool_to_mask(b: bool) -> u32 {
    if b { u32::MAX } else { 0 }
}
