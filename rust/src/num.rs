use serde::Serialize;
use serde::Serializer;
use std::hash::Hash;
use std::hash::Hasher;

/// A JavaScript number value. Wraps f64 to provide the Eq and Hash that the
/// tree model needs; equality is bitwise, so NaN == NaN and 0.0 != -0.0.
#[derive(Clone, Copy, Debug)]
pub struct JsNumber(pub f64);

impl PartialEq for JsNumber {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for JsNumber {}

impl Hash for JsNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.to_bits());
    }
}

// Serialises as the plain f64, so tree dumps read naturally.
impl Serialize for JsNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl From<f64> for JsNumber {
    fn from(v: f64) -> JsNumber {
        JsNumber(v)
    }
}
