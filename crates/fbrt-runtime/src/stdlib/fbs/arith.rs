use std::borrow::Cow;

use fbrt_types::{names, TypeId};
use tracing::trace;

use crate::fb::{DataSlot, FbBody, FbContext};
use crate::interface::{EventId, InterfaceSpec, WITH_END};
use crate::value::{is_implicit_conversion, AnyValue};

const EVENT_REQ: EventId = 0;
const EVENT_CNF: EventId = 0;

pub static F_ADD_SPEC: InterfaceSpec = InterfaceSpec {
    ei_names: Cow::Borrowed(&[names::REQ]),
    ei_with: Cow::Borrowed(&[0, 1, WITH_END]),
    ei_with_indexes: Cow::Borrowed(&[0]),
    eo_names: Cow::Borrowed(&[names::CNF]),
    eo_with: Cow::Borrowed(&[0, WITH_END]),
    eo_with_indexes: Cow::Borrowed(&[0]),
    di_names: Cow::Borrowed(&[names::IN1, names::IN2]),
    di_type_names: Cow::Borrowed(&[names::ANY_NUM, names::ANY_NUM]),
    do_names: Cow::Borrowed(&[names::OUT]),
    do_type_names: Cow::Borrowed(&[names::ANY_NUM]),
    adapters: Cow::Borrowed(&[]),
};

pub static F_ADD_DT_TIME_SPEC: InterfaceSpec = InterfaceSpec {
    ei_names: Cow::Borrowed(&[names::REQ]),
    ei_with: Cow::Borrowed(&[0, 1, WITH_END]),
    ei_with_indexes: Cow::Borrowed(&[0]),
    eo_names: Cow::Borrowed(&[names::CNF]),
    eo_with: Cow::Borrowed(&[0, WITH_END]),
    eo_with_indexes: Cow::Borrowed(&[0]),
    di_names: Cow::Borrowed(&[names::IN1, names::IN2]),
    di_type_names: Cow::Borrowed(&[names::DATE_AND_TIME, names::TIME]),
    do_names: Cow::Borrowed(&[names::OUT]),
    do_type_names: Cow::Borrowed(&[names::DATE_AND_TIME]),
    adapters: Cow::Borrowed(&[]),
};

pub static F_ACOS_SPEC: InterfaceSpec = InterfaceSpec {
    ei_names: Cow::Borrowed(&[names::REQ]),
    ei_with: Cow::Borrowed(&[0, WITH_END]),
    ei_with_indexes: Cow::Borrowed(&[0]),
    eo_names: Cow::Borrowed(&[names::CNF]),
    eo_with: Cow::Borrowed(&[0, WITH_END]),
    eo_with_indexes: Cow::Borrowed(&[0]),
    di_names: Cow::Borrowed(&[names::IN]),
    di_type_names: Cow::Borrowed(&[names::ANY_REAL]),
    do_names: Cow::Borrowed(&[names::OUT]),
    do_type_names: Cow::Borrowed(&[names::ANY_REAL]),
    adapters: Cow::Borrowed(&[]),
};

/// Result type of an output: the configured type, or `fallback` while the
/// output is still open.
fn output_type(ctx: &FbContext<'_>, fallback: TypeId) -> TypeId {
    ctx.core()
        .do_slot(0)
        .and_then(DataSlot::configured_type)
        .unwrap_or(fallback)
}

/// Type both operands widen to, falling back to the widest integer or real.
fn common_type(a: &AnyValue, b: &AnyValue) -> TypeId {
    let (left, right) = (a.type_id(), b.type_id());
    if is_implicit_conversion(left, right) {
        left
    } else if is_implicit_conversion(right, left) {
        right
    } else if a.is_integer() && b.is_integer() {
        TypeId::LINT
    } else {
        TypeId::LREAL
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn wrap_int(value: i128, target: TypeId) -> Option<AnyValue> {
    Some(match target {
        TypeId::SINT => AnyValue::SInt(value as i8),
        TypeId::INT => AnyValue::Int(value as i16),
        TypeId::DINT => AnyValue::DInt(value as i32),
        TypeId::LINT => AnyValue::LInt(value as i64),
        TypeId::USINT => AnyValue::USInt(value as u8),
        TypeId::UINT => AnyValue::UInt(value as u16),
        TypeId::UDINT => AnyValue::UDInt(value as u32),
        TypeId::ULINT => AnyValue::ULInt(value as u64),
        _ => return None,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn from_f64(value: f64, target: TypeId) -> Option<AnyValue> {
    match target {
        TypeId::REAL => Some(AnyValue::Real(value as f32)),
        TypeId::LREAL => Some(AnyValue::LReal(value)),
        _ => None,
    }
}

/// `OUT := IN1 + IN2` over `ANY_NUM`. Integer results wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct FAdd;

impl FbBody for FAdd {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        if event != EVENT_REQ {
            return;
        }
        let (a, b) = (ctx.di(0).clone(), ctx.di(1).clone());
        let target = output_type(ctx, common_type(&a, &b));
        let sum = match target {
            TypeId::REAL | TypeId::LREAL => a
                .as_f64()
                .zip(b.as_f64())
                .and_then(|(a, b)| from_f64(a + b, target)),
            _ => a
                .as_i128()
                .zip(b.as_i128())
                .and_then(|(a, b)| wrap_int(a + b, target)),
        };
        match sum {
            Some(sum) => *ctx.do_mut(0) = sum,
            None => trace!("{}: cannot add {a} and {b}", ctx.instance_name()),
        }
        ctx.send_output_event(EVENT_CNF);
    }
}

/// `OUT := IN1 + IN2` for `DATE_AND_TIME + TIME`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FAddDtTime;

impl FbBody for FAddDtTime {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        if event != EVENT_REQ {
            return;
        }
        let sum = match (ctx.di(0), ctx.di(1)) {
            (AnyValue::Dt(dt), AnyValue::Time(duration)) => dt.checked_add(*duration).ok(),
            _ => None,
        };
        match sum {
            Some(sum) => *ctx.do_mut(0) = AnyValue::Dt(sum),
            None => trace!("{}: DT + TIME out of range", ctx.instance_name()),
        }
        ctx.send_output_event(EVENT_CNF);
    }
}

/// `OUT := ACOS(IN)` over `ANY_REAL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FAcos;

impl FbBody for FAcos {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        if event != EVENT_REQ {
            return;
        }
        let input = ctx.di(0);
        let target = output_type(ctx, input.type_id());
        if let Some(result) = input.as_f64().and_then(|value| from_f64(value.acos(), target)) {
            *ctx.do_mut(0) = result;
        }
        ctx.send_output_event(EVENT_CNF);
    }
}
