//! JMP: bits 7..5 select the condition, bits 4..0 the target address.

use crate::exec::ExecOutcome;
use crate::system::PioSystem;

const COND_ALWAYS: u8 = 0b000;
const COND_X_ZERO: u8 = 0b001;
const COND_X_DEC: u8 = 0b010;
const COND_Y_ZERO: u8 = 0b011;
const COND_Y_DEC: u8 = 0b100;
const COND_X_NE_Y: u8 = 0b101;
const COND_PIN: u8 = 0b110;
const COND_OSR_NOT_EMPTY: u8 = 0b111;

pub(crate) fn exec(sys: &mut PioSystem, block: usize, sm: usize, instr: u16) -> ExecOutcome {
    let cond = ((instr >> 5) & 0b111) as u8;
    let target = (instr & 0x1F) as u8;

    let taken = match cond {
        COND_ALWAYS => true,
        COND_X_ZERO => sys.blocks[block].sm[sm].x == 0,
        COND_X_DEC => {
            let pre = sys.blocks[block].sm[sm].x;
            sys.blocks[block].sm[sm].x = pre.wrapping_sub(1);
            pre != 0
        }
        COND_Y_ZERO => sys.blocks[block].sm[sm].y == 0,
        COND_Y_DEC => {
            let pre = sys.blocks[block].sm[sm].y;
            sys.blocks[block].sm[sm].y = pre.wrapping_sub(1);
            pre != 0
        }
        COND_X_NE_Y => sys.blocks[block].sm[sm].x != sys.blocks[block].sm[sm].y,
        COND_PIN => {
            let gpio_base = sys.blocks[block].gpio_base;
            let pin = gpio_base as usize + sys.blocks[block].sm[sm].config.jmp_pin() as usize;
            sys.gpio.read_input(pin)
        }
        COND_OSR_NOT_EMPTY => {
            let sm_state = &sys.blocks[block].sm[sm];
            (sm_state.osr_count as u32) < sm_state.config.pull_threshold()
        }
        _ => unreachable!("3-bit condition"),
    };

    if taken {
        sys.blocks[block].sm[sm].pc = target;
    }
    ExecOutcome { pc_consumed: taken, suppress_delay: false }
}
