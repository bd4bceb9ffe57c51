use std::borrow::Cow;

use fbrt_types::names;

use crate::fb::{Ecc, EccState, FbBody, FbContext, Guard, Transition};
use crate::interface::{EventId, InterfaceSpec, WITH_END};
use crate::value::AnyValue;

const EVENT_R: EventId = 0;
const EVENT_S: EventId = 1;
const EVENT_EO: EventId = 0;

const STATE_SET: usize = 1;
const STATE_RESET: usize = 2;

pub static E_RS_SPEC: InterfaceSpec = InterfaceSpec {
    ei_names: Cow::Borrowed(&[names::R, names::S]),
    ei_with: Cow::Borrowed(&[]),
    ei_with_indexes: Cow::Borrowed(&[]),
    eo_names: Cow::Borrowed(&[names::EO]),
    eo_with: Cow::Borrowed(&[0, WITH_END]),
    eo_with_indexes: Cow::Borrowed(&[0]),
    di_names: Cow::Borrowed(&[]),
    di_type_names: Cow::Borrowed(&[]),
    do_names: Cow::Borrowed(&[names::Q]),
    do_type_names: Cow::Borrowed(&[names::BOOL]),
    adapters: Cow::Borrowed(&[]),
};

static E_RS_ECC: &[EccState] = &[
    EccState {
        name: "START",
        transitions: &[Transition {
            guard: Guard::Event(EVENT_S),
            target: STATE_SET,
        }],
    },
    EccState {
        name: "SET",
        transitions: &[Transition {
            guard: Guard::Event(EVENT_R),
            target: STATE_RESET,
        }],
    },
    EccState {
        name: "RESET",
        transitions: &[Transition {
            guard: Guard::Event(EVENT_S),
            target: STATE_SET,
        }],
    },
];

/// Event-driven set/reset latch. `S` sets `Q`, `R` clears it; each change
/// fires `EO`. Repeating the current command does nothing.
#[derive(Debug, Clone)]
pub struct ERs {
    ecc: Ecc,
}

impl ERs {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ecc: Ecc::new(E_RS_ECC),
        }
    }
}

impl Default for ERs {
    fn default() -> Self {
        Self::new()
    }
}

impl FbBody for ERs {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        self.ecc.run(event, |state| {
            let q = match state {
                STATE_SET => true,
                STATE_RESET => false,
                _ => return,
            };
            *ctx.do_mut(0) = AnyValue::Bool(q);
            ctx.send_output_event(EVENT_EO);
        });
    }

    fn on_reset(&mut self) {
        self.ecc.reset();
    }
}

pub static E_DEMUX_SPEC: InterfaceSpec = InterfaceSpec {
    ei_names: Cow::Borrowed(&[names::EI]),
    ei_with: Cow::Borrowed(&[0, WITH_END]),
    ei_with_indexes: Cow::Borrowed(&[0]),
    eo_names: Cow::Borrowed(&[names::EO0, names::EO1, names::EO2, names::EO3]),
    eo_with: Cow::Borrowed(&[]),
    eo_with_indexes: Cow::Borrowed(&[]),
    di_names: Cow::Borrowed(&[names::K]),
    di_type_names: Cow::Borrowed(&[names::UINT]),
    do_names: Cow::Borrowed(&[]),
    do_type_names: Cow::Borrowed(&[]),
    adapters: Cow::Borrowed(&[]),
};

/// Routes `EI` to output event `EO<K>`. Values of `K` above 3 fire nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct EDemux;

impl FbBody for EDemux {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        if event != 0 {
            return;
        }
        let Some(k) = ctx.di(0).as_i128() else {
            return;
        };
        // out-of-range outputs are dropped by the instance
        if let Ok(eo) = EventId::try_from(k) {
            ctx.send_output_event(eo);
        }
    }
}
