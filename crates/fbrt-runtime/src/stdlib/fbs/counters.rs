use std::borrow::Cow;

use fbrt_types::names;

use crate::fb::{FbBody, FbContext};
use crate::interface::{EventId, InterfaceSpec, WITH_END};
use crate::value::AnyValue;

const CD: u8 = 0;
const LD: u8 = 1;
const PV: u8 = 2;
const Q: u8 = 0;
const CV: u8 = 1;

pub static FB_CTD_UDINT_SPEC: InterfaceSpec = InterfaceSpec {
    ei_names: Cow::Borrowed(&[names::REQ]),
    ei_with: Cow::Borrowed(&[0, 2, 1, WITH_END]),
    ei_with_indexes: Cow::Borrowed(&[0]),
    eo_names: Cow::Borrowed(&[names::CNF]),
    eo_with: Cow::Borrowed(&[0, 1, WITH_END]),
    eo_with_indexes: Cow::Borrowed(&[0]),
    di_names: Cow::Borrowed(&[names::CD, names::LD, names::PV]),
    di_type_names: Cow::Borrowed(&[names::BOOL, names::BOOL, names::UDINT]),
    do_names: Cow::Borrowed(&[names::Q, names::CV]),
    do_type_names: Cow::Borrowed(&[names::BOOL, names::UDINT]),
    adapters: Cow::Borrowed(&[]),
};

/// Down counter. On `REQ`: `LD` loads `PV` into `CV`, otherwise `CD`
/// decrements a positive `CV`; `Q` is set when `CV` reaches zero. `CNF` is
/// fired for every input event.
#[derive(Debug, Clone, Copy, Default)]
pub struct FbCtdUdint;

impl FbBody for FbCtdUdint {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        if event == 0 {
            let flag = |port| ctx.di(port).as_bool().unwrap_or(false);
            let (cd, ld) = (flag(CD), flag(LD));
            let pv = udint(ctx.di(PV));
            let mut cv = udint(ctx.do_(CV));
            if ld {
                cv = pv;
            } else if cd && cv > 0 {
                cv -= 1;
            }
            *ctx.do_mut(CV) = AnyValue::UDInt(cv);
            *ctx.do_mut(Q) = AnyValue::Bool(cv == 0);
        }
        ctx.send_output_event(0);
    }
}

fn udint(value: &AnyValue) -> u32 {
    match value {
        AnyValue::UDInt(v) => *v,
        _ => 0,
    }
}
