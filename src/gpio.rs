//! GPIO bank: the single shared pin bus every state machine in every block
//! reads from and drives.
//!
//! The model collapses "pin" down to a bit position in one of a handful of
//! 64-bit masks. Four kinds of state are tracked per pin: the level the
//! outside world is presenting (`input_state`), the level this model is
//! driving out (`output_state`), which direction the pin is currently
//! configured as (`direction`), and whether an external stimulus currently
//! owns the pin (`ext_driven`). A fifth mask, `input_invert`, is pure
//! configuration - it never changes on its own and is XORed in on every
//! read of an input level.
//!
//! There is deliberately no pin-function-multiplexing model: any state
//! machine can address any pin. See the crate's expanded specification for
//! the list of deliberately unmodelled hardware behaviour.

use crate::NUM_GPIOS;

/// Aggregated pin state shared by every block and state machine.
#[derive(Debug, Clone)]
pub struct GpioBank {
    input_state: u64,
    output_state: u64,
    direction: u64,
    ext_driven: u64,
    input_invert: u64,
}

fn pin_mask(pin: usize) -> u64 {
    assert!(pin < NUM_GPIOS, "gpio pin {pin} out of range (max {NUM_GPIOS})");
    1u64 << pin
}

fn check_mask(mask: u64, what: &str) {
    let valid = if NUM_GPIOS >= 64 { u64::MAX } else { (1u64 << NUM_GPIOS) - 1 };
    assert!(mask & !valid == 0, "{what} references a gpio pin >= {NUM_GPIOS}");
}

impl Default for GpioBank {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioBank {
    /// All pins input, output-state pulled high (pull-up on undriven lines),
    /// nothing externally driven, nothing inverted.
    pub fn new() -> Self {
        GpioBank {
            input_state: u64::MAX,
            output_state: u64::MAX,
            direction: 0,
            ext_driven: 0,
            input_invert: 0,
        }
    }

    /// Reset to the power-on configuration (same as `new`).
    pub fn init_gpios(&mut self) {
        *self = Self::new();
    }

    pub fn set_pin_input(&mut self, pin: usize) {
        let m = pin_mask(pin);
        self.direction &= !m;
        // Pull-up: an undriven line reads high until something drives it.
        self.output_state |= m;
    }

    pub fn set_pin_output(&mut self, pin: usize) {
        self.direction |= pin_mask(pin);
    }

    pub fn set_input_level(&mut self, pin: usize, level: bool) {
        let m = pin_mask(pin);
        if level {
            self.input_state |= m;
        } else {
            self.input_state &= !m;
        }
    }

    pub fn set_output_level(&mut self, pin: usize, level: bool) {
        let m = pin_mask(pin);
        if level {
            self.output_state |= m;
        } else {
            self.output_state &= !m;
        }
    }

    pub fn set_input_invert(&mut self, pin: usize, inverted: bool) {
        let m = pin_mask(pin);
        if inverted {
            self.input_invert |= m;
        } else {
            self.input_invert &= !m;
        }
    }

    /// Observed input level for `pin`, with inversion applied.
    pub fn read_input(&self, pin: usize) -> bool {
        let m = pin_mask(pin);
        (self.input_state & m != 0) ^ (self.input_invert & m != 0)
    }

    pub fn direction_is_output(&self, pin: usize) -> bool {
        self.direction & pin_mask(pin) != 0
    }

    /// Drive a batch of pins externally. `mask` selects which pins are under
    /// external control; `levels` gives their levels. Pins not in `mask` are
    /// released and pulled high, matching an undriven input line. A
    /// subsequent call with a smaller mask releases the pins dropped from it.
    pub fn drive_gpios_ext(&mut self, mask: u64, levels: u64) {
        check_mask(mask, "drive_gpios_ext mask");
        check_mask(levels, "drive_gpios_ext levels");
        self.ext_driven = mask;
        self.input_state = (self.input_state & !mask) | (levels & mask) | !mask;
    }

    /// Per-pin observable level: output state while driving out, input
    /// state (invert applied) while configured as input.
    pub fn read_pin_states(&self) -> u64 {
        (self.output_state & self.direction) | (self.input_bus() & !self.direction)
    }

    fn input_bus(&self) -> u64 {
        self.input_state ^ self.input_invert
    }

    /// Pins currently being driven, whether by a state machine's own
    /// direction configuration or by an external stimulus.
    pub fn read_driven_pins(&self) -> u64 {
        self.ext_driven | self.direction
    }
}
