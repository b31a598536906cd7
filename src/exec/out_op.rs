//! OUT: bits 7..5 select the destination, bits 4..0 the bit count (0
//! encodes 32). Autopull is attempted before anything else; a stall there
//! skips the rest of the instruction entirely.

use crate::exec::common::{autopull_if_needed, decode_count, extract_from_osr, write_pindirs_value, write_pins_value};
use crate::exec::ExecOutcome;
use crate::system::PioSystem;

const DEST_PINS: u8 = 0b000;
const DEST_X: u8 = 0b001;
const DEST_Y: u8 = 0b010;
const DEST_NULL: u8 = 0b011;
const DEST_PINDIRS: u8 = 0b100;
const DEST_PC: u8 = 0b101;
const DEST_ISR: u8 = 0b110;
const DEST_EXEC: u8 = 0b111;

pub(crate) fn exec(sys: &mut PioSystem, block: usize, sm: usize, instr: u16) -> ExecOutcome {
    let dest = ((instr >> 5) & 0b111) as u8;
    let count = decode_count((instr & 0x1F) as u8);

    if !autopull_if_needed(&mut sys.blocks[block].sm[sm]) {
        sys.blocks[block].sm[sm].stalled = true;
        return ExecOutcome::default();
    }
    sys.blocks[block].sm[sm].stalled = false;

    let value = extract_from_osr(&mut sys.blocks[block].sm[sm], count);

    match dest {
        DEST_PINS => {
            let gpio_base = sys.blocks[block].gpio_base;
            let out_base = sys.blocks[block].sm[sm].config.out_base();
            write_pins_value(&mut sys.gpio, gpio_base, out_base, count as u8, value);
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
        DEST_NULL => ExecOutcome::default(),
        DEST_PINDIRS => {
            let gpio_base = sys.blocks[block].gpio_base;
            let out_base = sys.blocks[block].sm[sm].config.out_base();
            write_pindirs_value(&mut sys.gpio, gpio_base, out_base, count as u8, value);
            ExecOutcome::default()
        }
        DEST_PC => {
            sys.blocks[block].sm[sm].pc = value as u8;
            ExecOutcome { pc_consumed: true, suppress_delay: false }
        }
        DEST_ISR => {
            sys.blocks[block].sm[sm].isr = value;
            sys.blocks[block].sm[sm].isr_count = count as u8;
            ExecOutcome::default()
        }
        DEST_EXEC => {
            sys.blocks[block].sm[sm].pending_exec.instr = value as u16;
            sys.blocks[block].sm[sm].pending_exec.valid = true;
            ExecOutcome { pc_consumed: false, suppress_delay: true }
        }
        _ => unreachable!("3-bit destination"),
    }
}
