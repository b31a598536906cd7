//! IRQ: bit 6 is clear, bit 5 is wait, bits 4..3 select the target block
//! (shared with WAIT's IRQ source and MOV's STATUS source), bits 2..0 the
//! flag index within that block.

use crate::exec::common::resolve_irq_target;
use crate::exec::ExecOutcome;
use crate::system::PioSystem;

pub(crate) fn exec(sys: &mut PioSystem, block: usize, sm: usize, instr: u16) -> ExecOutcome {
    let clear = instr & (1 << 6) != 0;
    let wait = instr & (1 << 5) != 0;
    let selector = ((instr >> 3) & 0b11) as u8;
    let index = (instr & 0b111) as u8;
    let (target_block, target_index) = resolve_irq_target(block, selector, index, sm);

    if clear {
        // Clear wins over Wait when both bits are set.
        sys.blocks[target_block].irq.request_clear(target_index as usize);
        sys.blocks[block].sm[sm].stalled = false;
        return ExecOutcome::default();
    }

    if !wait {
        sys.blocks[target_block].irq.request_set(target_index as usize);
        return ExecOutcome::default();
    }

    // Clear=0, Wait=1: first execution schedules the set and stalls. A
    // re-execution must not re-request the set (already applied at the
    // prior cycle's finalisation) - it only re-checks the live flag.
    let already_waiting = sys.blocks[block].sm[sm].stalled;
    if !already_waiting {
        sys.blocks[target_block].irq.request_set(target_index as usize);
        sys.blocks[block].sm[sm].stalled = true;
    } else {
        let live = sys.blocks[target_block].irq.is_set(target_index as usize);
        sys.blocks[block].sm[sm].stalled = live;
    }
    ExecOutcome::default()
}

#[cfg(test)]
mod tests {
    use crate::system::PioSystem;
    use crate::test_utils::{encode_irq, full_range_wrap_execctrl};

    #[test]
    fn set_is_deferred_to_end_of_cycle() {
        let mut sys = PioSystem::new();
        sys.set_instr(0, 0, encode_irq(false, false, 0b00, 3, 0));
        sys.blocks[0].sm[0].enabled = true;
        sys.step_cycles(1);
        assert!(sys.blocks[0].irq.is_set(3));
    }

    #[test]
    fn irq_rel_from_sm_two_matches_worked_scenario() {
        let mut sys = PioSystem::new();
        sys.set_instr(0, 0, encode_irq(false, false, 0b10, 5, 0));
        sys.blocks[0].sm[2].enabled = true;
        sys.step_cycles(1);
        assert_eq!(sys.blocks[0].irq.flags(), 1 << 7);
    }

    #[test]
    fn clear_and_wait_both_set_clear_wins() {
        let mut sys = PioSystem::new();
        sys.blocks[0].irq.set_live(1);
        sys.set_instr(0, 0, encode_irq(true, true, 0b00, 1, 0));
        sys.blocks[0].sm[0].enabled = true;
        sys.step_cycles(1);
        assert!(!sys.blocks[0].irq.is_set(1));
        assert!(!sys.blocks[0].sm[0].stalled);
    }

    #[test]
    fn wait_stalls_then_releases_when_flag_clears() {
        let mut sys = PioSystem::new();
        sys.blocks[0].sm[0].config.execctrl = full_range_wrap_execctrl();
        sys.set_instr(0, 0, encode_irq(false, true, 0b00, 2, 0));
        sys.blocks[0].sm[0].enabled = true;
        sys.step_cycles(1);
        assert!(sys.blocks[0].sm[0].stalled);
        assert!(sys.blocks[0].irq.is_set(2));

        sys.blocks[0].irq.clear_live(2);
        sys.step_cycles(1);
        assert!(!sys.blocks[0].sm[0].stalled);
        assert_eq!(sys.blocks[0].sm[0].pc, 1);
    }
}
