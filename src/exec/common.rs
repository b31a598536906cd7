//! Helpers shared by every opcode family: pin addressing, the generic
//! shift-in/shift-out math, autopush/autopull attempts, and the block
//! selector used by IRQ/WAIT-IRQ/MOV-STATUS.

use crate::config::decode_threshold;
use crate::gpio::GpioBank;
use crate::sm::StateMachine;
use crate::system::PioSystem;
use crate::NUM_PIO_BLOCKS;

/// Translate a (window-relative base, offset) pair into an absolute pin
/// number: wrap inside the block's 32-pin window, then add the window's
/// origin (`gpio_base`, always 0 or 16).
pub(crate) fn block_pin(gpio_base: u32, base: u8, offset: u8) -> usize {
    gpio_base as usize + ((base as usize + offset as usize) % 32)
}

pub(crate) fn read_pins_value(gpio: &GpioBank, gpio_base: u32, base: u8, count: u8) -> u32 {
    let mut value = 0u32;
    for i in 0..count {
        if gpio.read_input(block_pin(gpio_base, base, i)) {
            value |= 1 << i;
        }
    }
    value
}

pub(crate) fn write_pins_value(gpio: &mut GpioBank, gpio_base: u32, base: u8, count: u8, value: u32) {
    for i in 0..count {
        let level = (value >> i) & 1 != 0;
        gpio.set_output_level(block_pin(gpio_base, base, i), level);
    }
}

pub(crate) fn write_pindirs_value(gpio: &mut GpioBank, gpio_base: u32, base: u8, count: u8, value: u32) {
    for i in 0..count {
        let pin = block_pin(gpio_base, base, i);
        if (value >> i) & 1 != 0 {
            gpio.set_pin_output(pin);
        } else {
            gpio.set_pin_input(pin);
        }
    }
}

/// Shift `count` bits of `source` into the ISR per the configured direction,
/// saturating the shift counter at 32. `count` must already be in 1..=32.
pub(crate) fn shift_into_isr(sm: &mut StateMachine, source: u32, count: u32) {
    debug_assert!((1..=32).contains(&count));
    sm.isr = if sm.config.in_shift_right() {
        if count == 32 { source } else { (sm.isr >> count) | (source << (32 - count)) }
    } else if count == 32 {
        source
    } else {
        (sm.isr << count) | (source & ((1u32 << count) - 1))
    };
    sm.isr_count = (sm.isr_count as u32 + count).min(32) as u8;
}

/// Extract `count` bits from the OSR per the configured direction, returning
/// the extracted value and shifting the OSR (and its counter) accordingly.
/// `count` must already be in 1..=32.
pub(crate) fn extract_from_osr(sm: &mut StateMachine, count: u32) -> u32 {
    debug_assert!((1..=32).contains(&count));
    let right = sm.config.out_shift_right();
    let value = if right {
        if count == 32 { sm.osr } else { sm.osr & ((1u32 << count) - 1) }
    } else if count == 32 {
        sm.osr
    } else {
        sm.osr >> (32 - count)
    };
    sm.osr = if right {
        if count == 32 { 0 } else { sm.osr >> count }
    } else if count == 32 {
        0
    } else {
        sm.osr << count
    };
    sm.osr_count = (sm.osr_count as u32 + count).min(32) as u8;
    value
}

/// Returns `true` if the state machine is clear to proceed (autopull
/// disabled, threshold not reached yet, or the refill succeeded) and
/// `false` if it must stall (autopull due, TX FIFO empty).
pub(crate) fn autopull_if_needed(sm: &mut StateMachine) -> bool {
    if !sm.config.autopull() || (sm.osr_count as u32) < sm.config.pull_threshold() {
        return true;
    }
    match sm.tx_fifo.try_pop() {
        Some(v) => {
            sm.osr = v;
            sm.osr_count = 0;
            true
        }
        None => false,
    }
}

/// Returns `true` if clear to proceed, `false` if the state machine must
/// stall waiting for RX FIFO space.
pub(crate) fn autopush_if_needed(sm: &mut StateMachine) -> bool {
    if !sm.config.autopush() || (sm.isr_count as u32) < sm.config.push_threshold() {
        return true;
    }
    if sm.rx_fifo.try_push(sm.isr) {
        sm.isr = 0;
        sm.isr_count = 0;
        true
    } else {
        false
    }
}

/// Decode a 5-bit count field shared by IN/OUT (0 encodes 32).
pub(crate) fn decode_count(raw: u8) -> u32 {
    decode_threshold(raw as u32)
}

/// Resolve an IRQ/WAIT-IRQ/MOV-STATUS block selector (2 bits) plus a 3-bit
/// flag index into a concrete (block, flag index) pair.
pub(crate) fn resolve_irq_target(own_block: usize, selector: u8, index: u8, sm_id: usize) -> (usize, u8) {
    match selector & 0b11 {
        0b00 => (own_block, index),
        0b01 => ((own_block + NUM_PIO_BLOCKS - 1) % NUM_PIO_BLOCKS, index),
        0b10 => {
            let rel_low = ((index as usize + sm_id) & 0b011) as u8;
            (own_block, (index & 0b100) | rel_low)
        }
        0b11 => ((own_block + 1) % NUM_PIO_BLOCKS, index),
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_pin_wraps_inside_window() {
        assert_eq!(block_pin(0, 30, 3), 1);
        assert_eq!(block_pin(16, 30, 3), 17);
    }

    #[test]
    fn shift_right_matches_hardware_convention() {
        let mut sm = StateMachine::new();
        sm.isr = 0;
        shift_into_isr(&mut sm, 0b1111, 4);
        assert_eq!(sm.isr, 0xF000_0000);
        assert_eq!(sm.isr_count, 4);
    }

    #[test]
    fn shift_left_matches_hardware_convention() {
        let mut sm = StateMachine::new();
        sm.config.shiftctrl = 0; // left shift (bit 18 clear)
        sm.isr = 0;
        shift_into_isr(&mut sm, 0b1111, 4);
        assert_eq!(sm.isr, 0b1111);
    }

    #[test]
    fn extract_right_shifts_osr_down() {
        let mut sm = StateMachine::new();
        sm.config.shiftctrl = 1 << 19; // shift right
        sm.osr = 0xDEAD_BEEF;
        let v = extract_from_osr(&mut sm, 8);
        assert_eq!(v, 0xEF);
        assert_eq!(sm.osr, 0x00DE_ADBE);
    }

    #[test]
    fn resolve_rel_matches_example_scenario() {
        let (block, idx) = resolve_irq_target(0, 0b10, 5, 2);
        assert_eq!(block, 0);
        assert_eq!(idx, 7);
    }

    #[test]
    fn resolve_prev_next_wrap_around_three_blocks() {
        assert_eq!(resolve_irq_target(0, 0b01, 3, 0).0, 2);
        assert_eq!(resolve_irq_target(2, 0b11, 3, 0).0, 0);
    }
}
