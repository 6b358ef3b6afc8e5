//! Generic decode/encode engine driven by the runtime PGN catalog. Field
//! dispatch is a closed `match` over `FieldType` rather than a table of
//! function pointers, and state that would otherwise live in statics
//! (the running manufacturer code, a field's raw integer for a later
//! indirect lookup) is threaded explicitly through `DecodeContext`/
//! `EncodeContext`.
use std::ops::RangeInclusive;

use indexmap::IndexMap;

use super::bits::{BitReader, BitWriter};
use super::traits::{DecodeContext, EncodeContext};
use crate::catalog::{entries_for_pgn, matching_pgns, FieldType, Message, PgnField, PgnInfo, RawMessage, Value};
use crate::error::{BitReaderError, DecodeError, EncodeError};

/// Canboat's reserved proprietary PGN ranges. A `proprietary` field only
/// decodes/encodes when `refPgn` (the last-seen field typed `Pgn`, defaulting
/// to the message's own PGN) falls inside one of these three ranges.
const PROPRIETARY_PGN_RANGES: [RangeInclusive<i64>; 3] = [65280..=65535, 126720..=126975, 130816..=131071];

/// Buffer large enough for the biggest payload any PGN in the catalog can
/// produce (a Fast Packet message at its maximum length).
const MAX_ENCODE_BUFFER: usize = crate::catalog::FAST_PACKET_MAX;

/// Decode a raw PGN payload into a fully resolved `Message`, selecting the
/// correct catalog entry when several share a PGN number.
pub fn decode_message(raw: &RawMessage) -> Result<Message, DecodeError> {
    let candidates = entries_for_pgn(raw.pgn);
    if candidates.is_empty() {
        return Err(DecodeError::UnknownPgn { pgn: raw.pgn });
    }
    let info = if candidates.len() == 1 {
        candidates[0]
    } else {
        select_candidate(raw.pgn, &candidates, &raw.data)?
    };

    let fields = decode_fields(info, &raw.data)?;
    Ok(Message {
        timestamp: raw.timestamp,
        priority: raw.priority,
        src: raw.src,
        dst: raw.dst,
        pgn: raw.pgn,
        description: info.description.to_string(),
        fields,
    })
}

/// Encode a `Message` into a raw payload, selecting the catalog entry whose
/// fields (name and matcher constants) agree with the message's own.
pub fn encode_message(message: &Message) -> Result<Vec<u8>, EncodeError> {
    let candidates = entries_for_pgn(message.pgn);
    let info = match candidates.len() {
        0 => return Err(EncodeError::UnknownPgn { pgn: message.pgn }),
        1 => candidates[0],
        _ => {
            let matching: Vec<_> = candidates
                .into_iter()
                .filter(|info| {
                    info.matcher.iter().all(|(order, expected)| {
                        field_at_order(info, *order)
                            .and_then(|f| message.fields.get(f.name))
                            .and_then(value_as_i64)
                            == Some(*expected)
                    })
                })
                .collect();
            match matching.len() {
                0 => return Err(EncodeError::UnknownPgn { pgn: message.pgn }),
                1 => matching[0],
                _ => return Err(EncodeError::AmbiguousPgn { pgn: message.pgn }),
            }
        }
    };
    encode_fields(info, &message.fields)
}

fn field_at_order(info: &PgnInfo, order: u16) -> Option<&'static PgnField> {
    info.fields.iter().find(|f| f.order == order)
}

fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(v) => Some(*v),
        _ => None,
    }
}

/// Decode just enough of the payload (using the first candidate's field
/// layout, which catalog authors keep identical up to the matcher fields
/// across every entry sharing a PGN) to resolve which entry actually
/// matches, then return it.
fn select_candidate(
    pgn: u32,
    candidates: &[&'static PgnInfo],
    payload: &[u8],
) -> Result<&'static PgnInfo, DecodeError> {
    let probe = candidates[0];
    let max_order = candidates
        .iter()
        .flat_map(|c| c.matcher.iter().map(|(order, _)| *order))
        .max()
        .unwrap_or(0);

    let mut reader = BitReader::new(payload);
    let mut ctx = DecodeContext::new(probe.pgn);
    for field in probe.fields.iter().filter(|f| f.order <= max_order) {
        decode_field(&mut reader, field, &mut ctx, probe)?;
    }

    let mut decoded_matcher_values = std::collections::HashMap::new();
    for (order, _) in candidates.iter().flat_map(|c| c.matcher.iter()) {
        if let Some(value) = ctx.get(*order) {
            decoded_matcher_values.insert(*order, value);
        }
    }

    match matching_pgns(pgn, &decoded_matcher_values).as_slice() {
        [] => Err(DecodeError::UnknownPgn { pgn }),
        [only] => Ok(*only),
        _ => Err(DecodeError::AmbiguousPgn { pgn }),
    }
}

/// Decode every field of `info` out of `payload`, including repeating groups.
pub fn decode_fields(info: &'static PgnInfo, payload: &[u8]) -> Result<IndexMap<String, Value>, DecodeError> {
    let mut reader = BitReader::new(payload);
    let mut ctx = DecodeContext::new(info.pgn);
    let mut fields = IndexMap::new();

    for field in info.fields.iter() {
        if in_repeating_group(info, field.order) {
            continue;
        }
        if let Some(value) = decode_field(&mut reader, field, &mut ctx, info)? {
            fields.insert(field.name.to_string(), value);
        }
    }

    for (index, group) in [info.repeating1, info.repeating2].into_iter().enumerate() {
        let Some(group) = group else { continue };
        let group_fields: Vec<&PgnField> = info
            .fields
            .iter()
            .filter(|f| f.order >= group.start && f.order < group.start + group.count)
            .collect();

        let count = match group.count_field {
            Some(order) => ctx.get(order).unwrap_or(0).max(0) as usize,
            None => {
                let group_bits: usize = group_fields.iter().map(|f| f.size as usize).sum();
                if group_bits == 0 {
                    0
                } else {
                    reader.bits_remaining() / group_bits
                }
            }
        };

        let mut repetitions = Vec::with_capacity(count);
        for _ in 0..count {
            let mut element = IndexMap::new();
            for field in &group_fields {
                if let Some(value) = decode_field(&mut reader, field, &mut ctx, info)? {
                    element.insert(field.name.to_string(), value);
                }
            }
            repetitions.push(element);
        }
        fields.insert(repeating_group_key(index).to_string(), Value::Repeating(repetitions));
    }

    Ok(fields)
}

fn in_repeating_group(info: &PgnInfo, order: u16) -> bool {
    [info.repeating1, info.repeating2]
        .into_iter()
        .flatten()
        .any(|group| order >= group.start && order < group.start + group.count)
}

/// Is `order` the counter field driving one of `info`'s repeating groups?
/// Such a field is written only from the element count during encoding,
/// never from a caller-supplied value, so it is excluded from the normal
/// field pass.
fn is_count_field(info: &PgnInfo, order: u16) -> bool {
    [info.repeating1, info.repeating2]
        .into_iter()
        .flatten()
        .any(|group| group.count_field == Some(order))
}

/// Literal key a PGN's repeating groups are stored under: `"list"` for the
/// first, `"list2"` for the second, per the documented data-model contract.
fn repeating_group_key(index: usize) -> &'static str {
    match index {
        0 => "list",
        _ => "list2",
    }
}

fn decode_field(
    reader: &mut BitReader,
    field: &'static PgnField,
    ctx: &mut DecodeContext,
    info: &'static PgnInfo,
) -> Result<Option<Value>, DecodeError> {
    if field.proprietary && !in_proprietary_range(ctx) {
        reader.advance(field.size as usize)?;
        return Ok(None);
    }

    match field.field_type {
        FieldType::Reserved | FieldType::Spare => {
            let bits = if field.size == 0 {
                reader.bits_remaining()
            } else {
                field.size as usize
            };
            reader.advance(bits)?;
            Ok(None)
        }
        FieldType::Number | FieldType::Mmsi | FieldType::Latitude | FieldType::Longitude => {
            let raw = read_int(reader, field)?;
            ctx.record(field.order, raw);
            Ok(Some(if is_missing(raw, field) {
                Value::Missing
            } else {
                scaled_value(raw, field)
            }))
        }
        FieldType::Pgn => {
            let raw = read_int(reader, field)?;
            ctx.record(field.order, raw);
            ctx.set_ref_pgn(raw);
            Ok(Some(if is_missing(raw, field) {
                Value::Missing
            } else {
                scaled_value(raw, field)
            }))
        }
        FieldType::Lookup => {
            let raw = read_int(reader, field)?;
            ctx.record(field.order, raw);
            if is_missing(raw, field) {
                return Ok(Some(Value::Missing));
            }
            field
                .lookup
                .forward(raw, None)
                .map(|name| Some(Value::EnumString(name.to_string())))
                .ok_or(DecodeError::LookupMiss {
                    field: field.name,
                    code: raw,
                })
        }
        FieldType::IndirectLookup => {
            let raw = read_int(reader, field)?;
            ctx.record(field.order, raw);
            if is_missing(raw, field) {
                return Ok(Some(Value::Missing));
            }
            let context_value = context_value(info, field, ctx);
            field
                .lookup
                .forward(raw, context_value)
                .map(|name| Some(Value::EnumString(name.to_string())))
                .ok_or(DecodeError::LookupMiss {
                    field: field.name,
                    code: raw,
                })
        }
        FieldType::BitLookup => {
            let raw = read_int(reader, field)?;
            ctx.record(field.order, raw);
            let names = field
                .lookup
                .bits_set(raw as u64)
                .into_iter()
                .map(str::to_string)
                .collect();
            Ok(Some(Value::BitSet(names)))
        }
        FieldType::Float => {
            let bytes = reader.read_slice(field.size as usize / 8)?;
            let value = match field.size {
                32 => f32::from_le_bytes(bytes.try_into().unwrap()) as f64,
                64 => f64::from_le_bytes(bytes.try_into().unwrap()),
                other => {
                    return Err(DecodeError::Fatal(format!(
                        "field \"{}\" has unsupported float width {other}",
                        field.name
                    )))
                }
            };
            Ok(Some(Value::Floating(value)))
        }
        FieldType::Decimal => {
            let bytes = reader.read_slice(field.size as usize / 8)?;
            Ok(Some(Value::Text(decode_bcd(bytes))))
        }
        FieldType::Binary => {
            let bits = if field.size == 0 {
                reader.bits_remaining()
            } else {
                field.size as usize
            };
            Ok(Some(Value::Bytes(reader.read_bits_as_bytes(bits)?)))
        }
        FieldType::StringFix => {
            let bytes = reader.read_slice(field.size as usize / 8)?;
            Ok(Some(Value::Text(decode_fixed_string(bytes))))
        }
        FieldType::StringLz => {
            let len = reader.read_unsigned(8)? as usize;
            if len == 0 {
                return Ok(Some(Value::Missing));
            }
            let bytes = reader.read_slice(len)?;
            Ok(Some(Value::Text(decode_fixed_string(bytes))))
        }
        FieldType::StringLau => {
            let len = reader.read_unsigned(8)? as usize;
            if len < 2 {
                return Ok(Some(Value::Missing));
            }
            let _encoding = reader.read_unsigned(8)?;
            let bytes = reader.read_slice(len - 2)?;
            Ok(Some(Value::Text(decode_fixed_string(bytes))))
        }
        FieldType::Date => {
            let raw = reader.read_unsigned(field.size as u8)?;
            ctx.record(field.order, raw as i64);
            if is_missing(raw as i64, field) {
                return Ok(Some(Value::Missing));
            }
            let epoch = chrono::DateTime::UNIX_EPOCH;
            Ok(Some(Value::Timestamp(epoch + chrono::Duration::days(raw as i64))))
        }
        FieldType::Time => {
            let raw = read_int(reader, field)?;
            if is_missing(raw, field) {
                return Ok(Some(Value::Missing));
            }
            let resolution = if field.resolution == 0.0 { 0.0001 } else { field.resolution };
            Ok(Some(Value::Duration(raw as f64 * resolution)))
        }
        FieldType::Duration => {
            let raw = read_int(reader, field)?;
            if is_missing(raw, field) {
                return Ok(Some(Value::Missing));
            }
            let resolution = if field.resolution == 0.0 { 1.0 } else { field.resolution };
            Ok(Some(Value::Duration(raw as f64 * resolution)))
        }
        FieldType::IsoName => {
            let raw = reader.read_unsigned(64)?;
            ctx.record(field.order, raw as i64);
            Ok(Some(Value::Integer(raw as i64)))
        }
        FieldType::Variable => decode_variable(reader, field, ctx, info),
        FieldType::KeyValue => Err(DecodeError::UnsupportedField(FieldType::KeyValue)),
    }
}

fn context_value(info: &PgnInfo, field: &PgnField, ctx: &DecodeContext) -> Option<i64> {
    let context_field = info.fields.iter().find(|f| Some(f.name) == field.context_field)?;
    ctx.get(context_field.order)
}

/// Decode a `Variable`-typed field: resolve the PGN and field order it
/// references (from the nearest earlier `Pgn`-typed field and from the
/// field named by `context_field`, respectively), then recurse into that
/// referenced field's own decode handler at the current bit position.
fn decode_variable(
    reader: &mut BitReader,
    field: &'static PgnField,
    ctx: &mut DecodeContext,
    info: &'static PgnInfo,
) -> Result<Option<Value>, DecodeError> {
    let ref_pgn = info
        .fields
        .iter()
        .filter(|f| matches!(f.field_type, FieldType::Pgn) && f.order < field.order)
        .filter_map(|f| ctx.get(f.order))
        .next_back()
        .ok_or_else(|| DecodeError::Fatal(format!("variable field \"{}\" has no preceding Pgn field", field.name)))?
        as u32;

    let ref_order = field
        .context_field
        .and_then(|name| info.fields.iter().find(|f| f.name == name))
        .and_then(|f| ctx.get(f.order))
        .ok_or_else(|| DecodeError::Fatal(format!("variable field \"{}\" has no context field", field.name)))?
        as u16;

    let ref_info = entries_for_pgn(ref_pgn)
        .into_iter()
        .next()
        .ok_or(DecodeError::UnknownPgn { pgn: ref_pgn })?;
    let ref_field = ref_info
        .fields
        .iter()
        .find(|f| f.order == ref_order)
        .ok_or(DecodeError::LookupMiss {
            field: field.name,
            code: ref_order as i64,
        })?;

    let inner =
        decode_field(reader, ref_field, &mut DecodeContext::new(ref_info.pgn), ref_info)?.unwrap_or(Value::Missing);
    Ok(Some(Value::Reference {
        pgn: ref_pgn,
        field_order: ref_order,
        value: Box::new(inner),
    }))
}

fn in_proprietary_range(ctx: &DecodeContext) -> bool {
    PROPRIETARY_PGN_RANGES.iter().any(|range| range.contains(&ctx.ref_pgn()))
}

fn read_int(reader: &mut BitReader, field: &PgnField) -> Result<i64, BitReaderError> {
    if field.has_sign {
        reader.read_signed(field.size as u8)
    } else {
        reader.read_unsigned(field.size as u8).map(|v| v as i64)
    }
}

fn is_missing(raw: i64, field: &PgnField) -> bool {
    if !field.missing_value_is_one || field.size == 0 || field.size > 63 {
        return false;
    }
    let all_ones = (1u64 << field.size) - 1;
    (raw as u64) & all_ones == all_ones
}

/// `physical = (raw + offset) * resolution`, or the plain integer
/// `raw + offset` when the field has no resolution.
fn scaled_value(raw: i64, field: &PgnField) -> Value {
    if field.resolution == 0.0 {
        Value::Integer(raw + field.offset)
    } else {
        Value::Floating((raw as f64 + field.offset as f64) * field.resolution)
    }
}

fn decode_fixed_string(bytes: &[u8]) -> String {
    let trimmed = bytes
        .iter()
        .position(|&b| b == 0x00)
        .map(|end| &bytes[..end])
        .unwrap_or(bytes);
    String::from_utf8_lossy(trimmed).trim_end().to_string()
}

fn decode_bcd(bytes: &[u8]) -> String {
    let mut digits = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        digits.push(char::from_digit((byte & 0x0F) as u32, 16).unwrap_or('0'));
        digits.push(char::from_digit((byte >> 4) as u32, 16).unwrap_or('0'));
    }
    digits
}

/// Encode every field of `info` from `fields` into a freshly allocated
/// payload, including repeating groups.
pub fn encode_fields(info: &'static PgnInfo, fields: &IndexMap<String, Value>) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = vec![0xFFu8; MAX_ENCODE_BUFFER];
    let mut ctx = EncodeContext::new(info.pgn);
    let mut writer = BitWriter::new(&mut buffer);

    for field in info.fields.iter() {
        if in_repeating_group(info, field.order) || is_count_field(info, field.order) {
            continue;
        }
        encode_field(&mut writer, field, fields.get(field.name), &mut ctx, info)?;
    }

    for (index, group) in [info.repeating1, info.repeating2].into_iter().enumerate() {
        let Some(group) = group else { continue };
        let group_fields: Vec<&PgnField> = info
            .fields
            .iter()
            .filter(|f| f.order >= group.start && f.order < group.start + group.count)
            .collect();
        let array_name = repeating_group_key(index);
        let repetitions = match fields.get(array_name) {
            Some(Value::Repeating(list)) => list.as_slice(),
            Some(_) => {
                return Err(EncodeError::WrongType {
                    field: "repeating group",
                    expected: "Repeating",
                })
            }
            None => &[],
        };

        if let Some(order) = group.count_field {
            let counter_field = field_at_order(info, order).ok_or_else(|| {
                EncodeError::Fatal(format!("repeating group has no counter field at order {order}"))
            })?;
            encode_field(
                &mut writer,
                counter_field,
                Some(&Value::Integer(repetitions.len() as i64)),
                &mut ctx,
                info,
            )?;
        }

        for element in repetitions {
            for field in &group_fields {
                encode_field(&mut writer, field, element.get(field.name), &mut ctx, info)?;
            }
        }
    }

    let len = writer.byte_length();
    if len > MAX_ENCODE_BUFFER {
        return Err(EncodeError::Oversize { len });
    }
    buffer.truncate(len);
    Ok(buffer)
}

fn encode_field(
    writer: &mut BitWriter,
    field: &'static PgnField,
    value: Option<&Value>,
    ctx: &mut EncodeContext,
    info: &'static PgnInfo,
) -> Result<(), EncodeError> {
    if field.proprietary && !encode_in_proprietary_range(ctx) {
        writer.advance(field.size as usize)?;
        return Ok(());
    }

    match field.field_type {
        FieldType::Reserved => {
            let bits = if field.size == 0 { 0 } else { field.size };
            writer.write_bit_repeat(true, bits as u8)?;
            Ok(())
        }
        FieldType::Spare => {
            let bits = if field.size == 0 { 0 } else { field.size };
            writer.write_bit_repeat(false, bits as u8)?;
            Ok(())
        }
        FieldType::Number | FieldType::Mmsi | FieldType::Latitude | FieldType::Longitude => {
            let raw = match value {
                None | Some(Value::Missing) => missing_pattern(field),
                Some(v) => unscale_value(v, field, field.name)?,
            };
            ctx.record(field.order, raw);
            writer.write_signed(raw, field.size as u8)?;
            Ok(())
        }
        FieldType::Pgn => {
            let raw = match value {
                None | Some(Value::Missing) => missing_pattern(field),
                Some(v) => unscale_value(v, field, field.name)?,
            };
            ctx.record(field.order, raw);
            ctx.set_ref_pgn(raw);
            writer.write_signed(raw, field.size as u8)?;
            Ok(())
        }
        FieldType::Lookup => {
            let raw = match value {
                None | Some(Value::Missing) => missing_pattern(field),
                Some(Value::EnumString(name)) => field.lookup.reverse(name, None).ok_or_else(|| {
                    EncodeError::LookupMiss {
                        field: field.name,
                        value: name.clone(),
                    }
                })?,
                Some(_) => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "EnumString",
                    })
                }
            };
            ctx.record(field.order, raw);
            writer.write_unsigned(raw as u64, field.size as u8)?;
            Ok(())
        }
        FieldType::IndirectLookup => {
            let ctx_value = field
                .context_field
                .and_then(|name| info.fields.iter().find(|f| f.name == name))
                .and_then(|f| ctx.get(f.order));
            let raw = match value {
                None | Some(Value::Missing) => missing_pattern(field),
                Some(Value::EnumString(name)) => {
                    field
                        .lookup
                        .reverse(name, ctx_value)
                        .ok_or_else(|| EncodeError::LookupMiss {
                            field: field.name,
                            value: name.clone(),
                        })?
                }
                Some(_) => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "EnumString",
                    })
                }
            };
            ctx.record(field.order, raw);
            writer.write_unsigned(raw as u64, field.size as u8)?;
            Ok(())
        }
        FieldType::BitLookup => {
            let names = match value {
                None => Vec::new(),
                Some(Value::BitSet(names)) => names.clone(),
                Some(_) => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "BitSet",
                    })
                }
            };
            let mut mask: u64 = 0;
            for name in &names {
                let bit = field.lookup.reverse(name, None).ok_or_else(|| EncodeError::LookupMiss {
                    field: field.name,
                    value: name.clone(),
                })?;
                mask |= 1u64 << (bit as u32);
            }
            ctx.record(field.order, mask as i64);
            writer.write_unsigned(mask, field.size as u8)?;
            Ok(())
        }
        FieldType::Float => {
            let v = match value {
                Some(Value::Floating(v)) => *v,
                Some(Value::Integer(v)) => *v as f64,
                None => return Err(EncodeError::MissingField { field: field.name }),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Floating",
                    })
                }
            };
            match field.size {
                32 => writer.write_slice(&(v as f32).to_le_bytes())?,
                64 => writer.write_slice(&v.to_le_bytes())?,
                other => {
                    return Err(EncodeError::Fatal(format!(
                        "field \"{}\" has unsupported float width {other}",
                        field.name
                    )))
                }
            }
            Ok(())
        }
        FieldType::Decimal => {
            let text = match value {
                Some(Value::Text(s)) => s.clone(),
                None => return Err(EncodeError::MissingField { field: field.name }),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Text",
                    })
                }
            };
            let bytes = encode_bcd(&text, field.size as usize / 8);
            writer.write_slice(&bytes)?;
            Ok(())
        }
        FieldType::Binary => {
            let bytes = match value {
                Some(Value::Bytes(b)) => b.clone(),
                None => Vec::new(),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Bytes",
                    })
                }
            };
            let bits = if field.size == 0 { bytes.len() * 8 } else { field.size as usize };
            writer.write_bytes_as_bits(&bytes, bits)?;
            Ok(())
        }
        FieldType::StringFix => {
            let text = match value {
                Some(Value::Text(s)) => s.clone(),
                None => String::new(),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Text",
                    })
                }
            };
            writer.write_slice(&encode_fixed_string(&text, field.size as usize / 8))?;
            Ok(())
        }
        FieldType::StringLz => {
            let text = match value {
                Some(Value::Text(s)) => s.clone(),
                None | Some(Value::Missing) => {
                    writer.write_unsigned(0, 8)?;
                    return Ok(());
                }
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Text",
                    })
                }
            };
            let bytes = text.as_bytes();
            writer.write_unsigned(bytes.len() as u64, 8)?;
            writer.write_slice(bytes)?;
            Ok(())
        }
        FieldType::StringLau => {
            let text = match value {
                Some(Value::Text(s)) => s.clone(),
                None | Some(Value::Missing) => {
                    writer.write_unsigned(0, 8)?;
                    return Ok(());
                }
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Text",
                    })
                }
            };
            let bytes = text.as_bytes();
            writer.write_unsigned((bytes.len() + 2) as u64, 8)?;
            writer.write_unsigned(1, 8)?; // ASCII encoding
            writer.write_slice(bytes)?;
            Ok(())
        }
        FieldType::Date => {
            let raw = match value {
                Some(Value::Timestamp(ts)) => (*ts - chrono::DateTime::UNIX_EPOCH).num_days(),
                None | Some(Value::Missing) => missing_pattern(field),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Timestamp",
                    })
                }
            };
            ctx.record(field.order, raw);
            writer.write_unsigned(raw as u64, field.size as u8)?;
            Ok(())
        }
        FieldType::Time => {
            let resolution = if field.resolution == 0.0 { 0.0001 } else { field.resolution };
            let raw = match value {
                Some(Value::Duration(seconds)) => (seconds / resolution).round() as i64,
                None | Some(Value::Missing) => missing_pattern(field),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Duration",
                    })
                }
            };
            writer.write_signed(raw, field.size as u8)?;
            Ok(())
        }
        FieldType::Duration => {
            let resolution = if field.resolution == 0.0 { 1.0 } else { field.resolution };
            let raw = match value {
                Some(Value::Duration(seconds)) => (seconds / resolution).round() as i64,
                None | Some(Value::Missing) => missing_pattern(field),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Duration",
                    })
                }
            };
            writer.write_signed(raw, field.size as u8)?;
            Ok(())
        }
        FieldType::IsoName => {
            let raw = match value {
                Some(Value::Integer(v)) => *v as u64,
                None => return Err(EncodeError::MissingField { field: field.name }),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Integer",
                    })
                }
            };
            ctx.record(field.order, raw as i64);
            writer.write_unsigned(raw, 64)?;
            Ok(())
        }
        FieldType::Variable => {
            let (ref_pgn, ref_order, inner) = match value {
                Some(Value::Reference { pgn, field_order, value }) => (*pgn, *field_order, value.as_ref()),
                None => return Err(EncodeError::MissingField { field: field.name }),
                _ => {
                    return Err(EncodeError::WrongType {
                        field: field.name,
                        expected: "Reference",
                    })
                }
            };
            let ref_info = entries_for_pgn(ref_pgn).into_iter().next().ok_or(EncodeError::UnknownPgn { pgn: ref_pgn })?;
            let ref_field = ref_info
                .fields
                .iter()
                .find(|f| f.order == ref_order)
                .ok_or_else(|| EncodeError::Fatal(format!("no field at order {ref_order} in PGN {ref_pgn}")))?;
            encode_field(writer, ref_field, Some(inner), &mut EncodeContext::new(ref_info.pgn), ref_info)
        }
        FieldType::KeyValue => Err(EncodeError::UnsupportedField(FieldType::KeyValue)),
    }
}

fn encode_in_proprietary_range(ctx: &EncodeContext) -> bool {
    PROPRIETARY_PGN_RANGES.iter().any(|range| range.contains(&ctx.ref_pgn()))
}

fn missing_pattern(field: &PgnField) -> i64 {
    if field.size == 0 || field.size >= 64 {
        return -1;
    }
    ((1u64 << field.size) - 1) as i64
}

fn unscale_value(value: &Value, field: &PgnField, name: &'static str) -> Result<i64, EncodeError> {
    match value {
        Value::Integer(v) => Ok(v - field.offset),
        Value::Floating(v) => {
            let resolution = if field.resolution == 0.0 { 1.0 } else { field.resolution };
            Ok((v / resolution).round() as i64 - field.offset)
        }
        _ => Err(EncodeError::WrongType {
            field: name,
            expected: "Integer or Floating",
        }),
    }
}

fn encode_fixed_string(text: &str, len: usize) -> Vec<u8> {
    let mut bytes = text.as_bytes().to_vec();
    bytes.resize(len, 0x00);
    bytes.truncate(len);
    bytes
}

fn encode_bcd(digits: &str, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    let chars: Vec<char> = digits.chars().collect();
    for (i, byte) in bytes.iter_mut().enumerate() {
        let lo = chars.get(i * 2).and_then(|c| c.to_digit(16)).unwrap_or(0) as u8;
        let hi = chars.get(i * 2 + 1).and_then(|c| c.to_digit(16)).unwrap_or(0) as u8;
        *byte = lo | (hi << 4);
    }
    bytes
}
