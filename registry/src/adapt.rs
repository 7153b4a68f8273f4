//! Aggregate `out` adaptation.
//!
//! A body declared with [`OutConvention::Aggregate`] receives its
//! pre-allocated outputs as one struct. Callers instead pass one keyword per
//! field. The wrapper built here collects those keywords back into the struct
//! the body expects.

use std::sync::Arc;

use decomp_ops::error::MalformedOutputAdaptationSnafu;
use decomp_ops::{CallArgs, Decomposition, OutConvention, OutputSpec, StructValue, Value};

/// Wrap `decomposition` if it expects an aggregate `out`, otherwise return it as is.
///
/// The result has the [`OutConvention::PerSlot`] convention, so adapting it
/// again is a no-op.
pub fn adapt_output(decomposition: Decomposition) -> Decomposition {
    let spec = match decomposition.convention() {
        OutConvention::Aggregate(spec) => Arc::clone(spec),
        _ => return decomposition,
    };

    tracing::trace!(
        decomposition = decomposition.name(),
        structure = %spec.type_name,
        slots = spec.fields.len(),
        "adapting aggregate output"
    );

    let name = decomposition.shared_name().clone();
    let body = decomposition;
    let slots = Arc::clone(&spec);
    let wrapper = move |mut args: CallArgs| -> decomp_ops::Result<Value> {
        let out = gather_slots(&slots, &mut args)?;
        args.keywords.insert(OutputSpec::PARAMETER.to_string(), out);
        body.call(args)
    };

    Decomposition::from_parts(name, Arc::new(wrapper), OutConvention::PerSlot(spec))
}

/// Pull every slot keyword out of `args` and build the aggregate.
///
/// Unset slots are missing keywords or explicit `Value::None`.
fn gather_slots(spec: &OutputSpec, args: &mut CallArgs) -> decomp_ops::Result<Value> {
    let values: Vec<Option<Value>> =
        spec.fields.iter().map(|field| args.take_keyword(field).filter(|value| !value.is_none())).collect();

    let provided = values.iter().filter(|value| value.is_some()).count();
    if provided == 0 {
        return Ok(Value::None);
    }

    if provided < spec.fields.len() {
        let (set, unset): (Vec<_>, Vec<_>) = spec.fields.iter().zip(&values).partition(|(_, value)| value.is_some());
        return MalformedOutputAdaptationSnafu {
            structure: spec.type_name.clone(),
            provided: set.into_iter().map(|(field, _)| field.clone()).collect::<Vec<_>>(),
            missing: unset.into_iter().map(|(field, _)| field.clone()).collect::<Vec<_>>(),
        }
        .fail();
    }

    let fields = spec.fields.iter().cloned().zip(values.into_iter().flatten());
    Ok(Value::Struct(StructValue::new(spec.type_name.clone(), fields)))
}
