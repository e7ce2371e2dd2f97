use crate::udbc::value::Value;
use crate::udbc_sqlanywhere::api::DataValue;

pub fn from_sa_value(v: &DataValue) -> Value {
    match v {
        DataValue::Null => Value::Null,
        DataValue::Binary(b) => Value::Bytes(b.clone()),
        DataValue::String(s) => Value::Str(s.clone()),
        DataValue::Double(d) => Value::F64(*d),
        DataValue::Val64(i) => Value::I64(*i),
        DataValue::UVal64(u) => Value::from_u64(*u),
        DataValue::Val32(i) => Value::I32(*i),
        DataValue::UVal32(u) => Value::I64(*u as i64),
        DataValue::Val16(i) => Value::I16(*i),
        DataValue::UVal16(u) => Value::I32(*u as i32),
        DataValue::Val8(i) => Value::I16(*i as i16),
        DataValue::UVal8(u) => Value::U8(*u),
    }
}

pub fn to_sa_value(v: &Value) -> DataValue {
    match v {
        Value::Null => DataValue::Null,
        Value::Bool(b) => DataValue::UVal8(u8::from(*b)),
        Value::I16(i) => DataValue::Val16(*i),
        Value::I32(i) => DataValue::Val32(*i),
        Value::I64(i) => DataValue::Val64(*i),
        Value::U8(u) => DataValue::UVal8(*u),
        Value::F64(f) => DataValue::Double(*f),
        Value::Str(s) => DataValue::String(s.clone()),
        Value::Bytes(b) => DataValue::Binary(b.clone()),
        Value::Decimal(d) => DataValue::String(d.to_string()),
        Value::Date(_) | Value::Time(_) | Value::DateTime(_) | Value::DateTimeUtc(_) => {
            DataValue::String(v.temporal_text().unwrap_or_default())
        }
    }
}
