//! IN: bits 7..5 select the source, bits 4..0 the bit count (0 encodes 32).

use crate::exec::common::{autopush_if_needed, decode_count, read_pins_value, shift_into_isr};
use crate::exec::ExecOutcome;
use crate::system::PioSystem;

const SRC_PINS: u8 = 0b000;
const SRC_X: u8 = 0b001;
const SRC_Y: u8 = 0b010;
const SRC_NULL: u8 = 0b011;
const SRC_ISR: u8 = 0b110;
const SRC_OSR: u8 = 0b111;

pub(crate) fn exec(sys: &mut PioSystem, block: usize, sm: usize, instr: u16) -> ExecOutcome {
    let source = ((instr >> 5) & 0b111) as u8;
    let count = decode_count((instr & 0x1F) as u8);

    // A re-entry after an autopush stall must retry only the autopush, not
    // repeat the shift that already happened on the original execution.
    let retrying = sys.blocks[block].sm[sm].stalled;
    if !retrying {
        let gpio_base = sys.blocks[block].gpio_base;
        let in_base = sys.blocks[block].sm[sm].config.in_base();
        let source_value = match source {
            SRC_PINS => read_pins_value(&sys.gpio, gpio_base, in_base, count as u8),
            SRC_X => sys.blocks[block].sm[sm].x,
            SRC_Y => sys.blocks[block].sm[sm].y,
            SRC_NULL => 0,
            SRC_ISR => sys.blocks[block].sm[sm].isr,
            SRC_OSR => sys.blocks[block].sm[sm].osr,
            other => panic!("reserved IN source encoding {other:#05b}"),
        };
        shift_into_isr(&mut sys.blocks[block].sm[sm], source_value, count);
    }

    let ok = autopush_if_needed(&mut sys.blocks[block].sm[sm]);
    sys.blocks[block].sm[sm].stalled = !ok;
    ExecOutcome::default()
}

#[cfg(test)]
mod tests {
    use crate::system::PioSystem;
    use crate::test_utils::encode_in;

    #[test]
    fn autopush_fires_at_threshold_eight() {
        let mut sys = PioSystem::new();
        sys.blocks[0].sm[0].x = 25;
        sys.blocks[0].sm[0].config.shiftctrl = 1 << 16 | (8 << 20); // autopush, threshold 8
        sys.set_instr(0, 0, encode_in(SRC_X_CODE, 8, 0));
        sys.blocks[0].sm[0].enabled = true;
        sys.step_cycles(1);

        assert_eq!(sys.blocks[0].sm[0].rx_fifo.depth(), 1);
        assert_eq!(sys.blocks[0].sm[0].rx_fifo.peek(0), 0x19);
        assert_eq!(sys.blocks[0].sm[0].isr, 0);
        assert_eq!(sys.blocks[0].sm[0].isr_count, 0);
    }

    #[test]
    fn autopush_stall_retries_without_repeating_the_shift() {
        let mut sys = PioSystem::new();
        sys.blocks[0].sm[0].x = 0xFF;
        sys.blocks[0].sm[0].config.shiftctrl = 1 << 16 | (8 << 20); // autopush, threshold 8
        sys.blocks[0].sm[0].config.execctrl = crate::test_utils::full_range_wrap_execctrl();
        sys.set_instr(0, 0, encode_in(SRC_X_CODE, 8, 0));
        sys.blocks[0].sm[0].enabled = true;
        for _ in 0..crate::MAX_FIFO_DEPTH {
            sys.blocks[0].sm[0].rx_fifo.push(0);
        }

        // RX is full: the shift happens but the autopush can't land, so the
        // state machine stalls with the ISR already holding the shifted-in
        // byte.
        sys.step_cycles(1);
        assert!(sys.blocks[0].sm[0].stalled);
        assert_eq!(sys.blocks[0].sm[0].pc, 0);
        assert_eq!(sys.blocks[0].sm[0].isr, 0xFF);
        assert_eq!(sys.blocks[0].sm[0].isr_count, 8);

        // Draining one entry frees a slot; on retry only the autopush must
        // fire, not a second shift (which would have pushed 0x1FF instead).
        sys.blocks[0].sm[0].rx_fifo.pop();
        sys.step_cycles(1);
        assert!(!sys.blocks[0].sm[0].stalled);
        assert_eq!(sys.blocks[0].sm[0].pc, 1);
        assert_eq!(sys.blocks[0].sm[0].isr, 0);
        assert_eq!(sys.blocks[0].sm[0].isr_count, 0);
        assert_eq!(sys.blocks[0].sm[0].rx_fifo.peek(3), 0xFF);
    }

    const SRC_X_CODE: u8 = 0b001;
}
