//! WAIT: bit 7 is polarity, bits 6..5 select the source, bits 4..0 are the
//! source-specific index.

use crate::exec::common::resolve_irq_target;
use crate::exec::ExecOutcome;
use crate::system::PioSystem;

const SRC_GPIO: u8 = 0b00;
const SRC_PIN: u8 = 0b01;
const SRC_IRQ: u8 = 0b10;
const SRC_JMP_PIN: u8 = 0b11;

pub(crate) fn exec(sys: &mut PioSystem, block: usize, sm: usize, instr: u16) -> ExecOutcome {
    let polarity = (instr >> 7) & 1 != 0;
    let source = ((instr >> 5) & 0b11) as u8;
    let index = (instr & 0x1F) as u8;

    let matched = match source {
        SRC_GPIO => {
            let pin = sys.blocks[block].gpio_base as usize + index as usize;
            sys.gpio.read_input(pin) == polarity
        }
        SRC_PIN => {
            let base = sys.blocks[block].sm[sm].config.in_base();
            let pin = sys.blocks[block].gpio_base as usize + ((base as usize + index as usize) % 32);
            sys.gpio.read_input(pin) == polarity
        }
        SRC_IRQ => {
            let selector = (index >> 3) & 0b11;
            let flag = index & 0b111;
            let (tb, ti) = resolve_irq_target(block, selector, flag, sm);
            let live = sys.blocks[tb].irq.is_set(ti as usize);
            let matched = live == polarity;
            if matched && polarity {
                sys.blocks[tb].irq.request_clear(ti as usize);
            }
            matched
        }
        SRC_JMP_PIN => {
            let pin_offset = sys.blocks[block].sm[sm].config.jmp_pin();
            let pin = sys.blocks[block].gpio_base as usize + pin_offset as usize;
            sys.gpio.read_input(pin) == polarity
        }
        _ => unreachable!("2-bit source"),
    };

    sys.blocks[block].sm[sm].stalled = !matched;
    ExecOutcome::default()
}

#[cfg(test)]
mod tests {
    use crate::system::PioSystem;
    use crate::test_utils::{encode_wait, full_range_wrap_execctrl};

    #[test]
    fn wait_gpio_stalls_until_level_matches() {
        let mut sys = PioSystem::new();
        sys.blocks[0].sm[0].config.execctrl = full_range_wrap_execctrl();
        sys.set_instr(0, 0, encode_wait(true, 0b00, 3, 0));
        sys.blocks[0].sm[0].enabled = true;
        sys.gpio.set_input_level(3, false);
        sys.step_cycles(3);
        assert!(sys.blocks[0].sm[0].stalled);
        assert_eq!(sys.blocks[0].sm[0].pc, 0);

        sys.gpio.set_input_level(3, true);
        sys.step_cycles(1);
        assert!(!sys.blocks[0].sm[0].stalled);
        assert_eq!(sys.blocks[0].sm[0].pc, 1);
    }

    #[test]
    fn wait_irq_high_clears_the_flag_on_match() {
        let mut sys = PioSystem::new();
        sys.set_instr(0, 0, encode_wait(true, 0b10, 0, 0));
        sys.blocks[0].sm[0].enabled = true;
        sys.blocks[0].irq.set_live(0);
        sys.step_cycles(1);
        assert!(!sys.blocks[0].sm[0].stalled);
        assert!(!sys.blocks[0].irq.is_set(0));
    }
}
