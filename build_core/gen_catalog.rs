//! Turns the bundled PGN database (`build_core/var/canboat.json`) plus the
//! manifest (`build_core/var/pgn_manifest.json`) into the `PGN_TABLE: &[PgnInfo]`
//! source text `src/catalog.rs` pulls in via `include!`. Every identifier
//! emitted here (`PgnInfo`, `PgnField`, `Lookup`, `FieldType`, `PacketType`,
//! `RepeatingGroup`) resolves against `catalog.rs`'s own scope at include
//! time; this module never needs to import them itself.
use std::collections::HashMap;

use crate::build_core::domain::{
    Fields, LookupBitEnum, LookupEnum, LookupFieldTypeEnum, LookupIndirectEnum, Manifest, PgnInstructions,
};
use crate::build_core::errors::BuildError;
use crate::build_core::name_helpers::to_snake_case;

#[derive(Default)]
struct LookupTables {
    pair: HashMap<String, Vec<(i64, String)>>,
    triplet: HashMap<String, Vec<(i64, i64, String)>>,
    bit: HashMap<String, Vec<(u8, String)>>,
    fieldtype: HashMap<String, Vec<(i64, String)>>,
}

impl LookupTables {
    fn parse(db: &serde_json::Value) -> Result<Self, BuildError> {
        let empty = || serde_json::Value::Array(Vec::new());
        let pair_defs: Vec<LookupEnum> =
            serde_json::from_value(db.get("LookupEnumerations").cloned().unwrap_or_else(empty))?;
        let triplet_defs: Vec<LookupIndirectEnum> = serde_json::from_value(
            db.get("LookupIndirectEnumerations")
                .cloned()
                .unwrap_or_else(empty),
        )?;
        let bit_defs: Vec<LookupBitEnum> = serde_json::from_value(
            db.get("LookupBitEnumerations").cloned().unwrap_or_else(empty),
        )?;
        let fieldtype_defs: Vec<LookupFieldTypeEnum> = serde_json::from_value(
            db.get("LookupFieldTypeEnumerations")
                .cloned()
                .unwrap_or_else(empty),
        )?;

        let mut tables = LookupTables::default();
        for def in pair_defs {
            let entries = def.enum_values.into_iter().map(|v| (v.value, v.name)).collect();
            tables.pair.insert(def.name, entries);
        }
        for def in triplet_defs {
            let entries = def
                .enum_values
                .into_iter()
                .map(|v| (v.value1, v.value2, v.name))
                .collect();
            tables.triplet.insert(def.name, entries);
        }
        for def in bit_defs {
            let entries = def.bit_values.into_iter().map(|v| (v.bit, v.name)).collect();
            tables.bit.insert(def.name, entries);
        }
        for def in fieldtype_defs {
            let entries = def.enum_values.into_iter().map(|v| (v.value, v.name)).collect();
            tables.fieldtype.insert(def.name, entries);
        }
        Ok(tables)
    }
}

/// Escapes `s` as a Rust string literal (relies on `Debug` producing valid,
/// safely escaped Rust string syntax).
fn render_string(s: &str) -> String {
    format!("{s:?}")
}

fn render_option_str(s: &Option<String>) -> String {
    match s {
        Some(v) => format!("Some({})", render_string(v)),
        None => "None".to_string(),
    }
}

/// Renders `v` so it always parses back as an `f64` literal (`Debug` on
/// floats always emits a decimal point or exponent).
fn render_f64(v: f64) -> String {
    format!("{v:?}")
}

fn field_type_token(pgn: u32, field: &Fields) -> Result<&'static str, BuildError> {
    Ok(match field.kind.as_str() {
        "NUMBER" => "FieldType::Number",
        "FLOAT" => "FieldType::Float",
        "LOOKUP" => "FieldType::Lookup",
        "INDIRECT_LOOKUP" => "FieldType::IndirectLookup",
        "BITLOOKUP" => "FieldType::BitLookup",
        "PGN" => "FieldType::Pgn",
        "DATE" => "FieldType::Date",
        "TIME" => "FieldType::Time",
        "DURATION" => "FieldType::Duration",
        "MMSI" => "FieldType::Mmsi",
        "DECIMAL" => "FieldType::Decimal",
        "STRING_FIX" => "FieldType::StringFix",
        "STRING_LZ" => "FieldType::StringLz",
        "STRING_LAU" => "FieldType::StringLau",
        "BINARY" => "FieldType::Binary",
        "RESERVED" => "FieldType::Reserved",
        "SPARE" => "FieldType::Spare",
        "ISO_NAME" => "FieldType::IsoName",
        "LATITUDE" => "FieldType::Latitude",
        "LONGITUDE" => "FieldType::Longitude",
        "VARIABLE" => "FieldType::Variable",
        "KEY_VALUE" => "FieldType::KeyValue",
        other => {
            return Err(BuildError::UnknownFieldType {
                pgn,
                field: field.id.clone(),
                kind: other.to_string(),
            })
        }
    })
}

fn packet_type_token(pgn: u32, kind: &str) -> Result<&'static str, BuildError> {
    Ok(match kind {
        "Single" => "PacketType::Single",
        "Fast" => "PacketType::Fast",
        "Mixed" => "PacketType::Mixed",
        "ISO" => "PacketType::IsoTp",
        other => {
            return Err(BuildError::UnknownPacketType {
                pgn,
                kind: other.to_string(),
            })
        }
    })
}

fn context_field_name(fields: &[Fields], order: Option<u16>) -> Option<String> {
    let order = order?;
    fields
        .iter()
        .find(|f| f.order == order)
        .map(|f| to_snake_case(&f.id, "field"))
}

fn render_lookup(pgn: u32, field: &Fields, tables: &LookupTables) -> Result<String, BuildError> {
    if let Some(name) = field.enum_fieldtype_name.as_deref() {
        let entries = tables.fieldtype.get(name).ok_or_else(|| BuildError::UnknownLookup {
            pgn,
            field: field.id.clone(),
            lookup: name.to_string(),
        })?;
        let rendered: Vec<String> = entries
            .iter()
            .map(|(c, n)| format!("({c}, {})", render_string(n)))
            .collect();
        return Ok(format!("Lookup::FieldType(&[{}])", rendered.join(", ")));
    }
    match field.kind.as_str() {
        "LOOKUP" => {
            let name = field.enum_direct_name.as_deref().unwrap_or_default();
            let entries = tables.pair.get(name).ok_or_else(|| BuildError::UnknownLookup {
                pgn,
                field: field.id.clone(),
                lookup: name.to_string(),
            })?;
            let rendered: Vec<String> = entries
                .iter()
                .map(|(c, n)| format!("({c}, {})", render_string(n)))
                .collect();
            Ok(format!("Lookup::Pair(&[{}])", rendered.join(", ")))
        }
        "INDIRECT_LOOKUP" => {
            let name = field.enum_indirect_name.as_deref().unwrap_or_default();
            let entries = tables.triplet.get(name).ok_or_else(|| BuildError::UnknownLookup {
                pgn,
                field: field.id.clone(),
                lookup: name.to_string(),
            })?;
            let rendered: Vec<String> = entries
                .iter()
                .map(|(c, v, n)| format!("({c}, {v}, {})", render_string(n)))
                .collect();
            Ok(format!("Lookup::Triplet(&[{}])", rendered.join(", ")))
        }
        "BITLOOKUP" => {
            let name = field.enum_bit_name.as_deref().unwrap_or_default();
            let entries = tables.bit.get(name).ok_or_else(|| BuildError::UnknownLookup {
                pgn,
                field: field.id.clone(),
                lookup: name.to_string(),
            })?;
            let rendered: Vec<String> = entries
                .iter()
                .map(|(b, n)| format!("({b}, {})", render_string(n)))
                .collect();
            Ok(format!("Lookup::Bit(&[{}])", rendered.join(", ")))
        }
        _ => Ok("Lookup::None".to_string()),
    }
}

fn render_field(
    pgn: &PgnInstructions,
    field: &Fields,
    tables: &LookupTables,
) -> Result<String, BuildError> {
    let name = to_snake_case(&field.id, "field");
    let description = render_string(&field.name);
    let size = field.bits_length.unwrap_or(0);
    let resolution = render_f64(field.resolution.unwrap_or(0.0));
    let unit = render_option_str(&field.unit);
    let lookup = render_lookup(pgn.pgn_id, field, tables)?;
    let context_field = if field.kind == "INDIRECT_LOOKUP" {
        match context_field_name(&pgn.fields, field.enum_indirect_field_order) {
            Some(n) => format!("Some({})", render_string(&n)),
            None => "None".to_string(),
        }
    } else {
        "None".to_string()
    };
    let field_type = field_type_token(pgn.pgn_id, field)?;

    Ok(format!(
        "            PgnField {{ name: {name:?}, description: {description}, order: {order}, \
         size: {size}, offset: 0, resolution: {resolution}, has_sign: {has_sign}, \
         proprietary: {proprietary}, missing_value_is_one: {missing}, unit: {unit}, \
         lookup: {lookup}, context_field: {context_field}, field_type: {field_type} }},\n",
        order = field.order,
        has_sign = field.signed.unwrap_or(false),
        proprietary = field.proprietary,
        missing = field.missing_value_is_one,
    ))
}

fn render_repeating_group(
    size: Option<u16>,
    start: Option<u16>,
    count_field: Option<u16>,
) -> String {
    match (start, size) {
        (Some(start), Some(count)) => {
            let count_field = match count_field {
                Some(f) => format!("Some({f})"),
                None => "None".to_string(),
            };
            format!(
                "Some(RepeatingGroup {{ start: {start}, count: {count}, count_field: {count_field} }})"
            )
        }
        _ => "None".to_string(),
    }
}

fn render_pgn(pgn: &PgnInstructions, tables: &LookupTables) -> Result<String, BuildError> {
    let description = render_string(&pgn.pgn_description);
    let packet_type = packet_type_token(pgn.pgn_id, &pgn.fastpacket)?;
    let repeating1 = render_repeating_group(
        pgn.repeating_field_set_1_size,
        pgn.repeating_field_set_1_start_field,
        pgn.repeating_field_set_1_count_field,
    );
    let repeating2 = render_repeating_group(
        pgn.repeating_field_set_2_size,
        pgn.repeating_field_set_2_start_field,
        pgn.repeating_field_set_2_count_field,
    );

    let mut fields_src = String::new();
    for field in &pgn.fields {
        fields_src.push_str(&render_field(pgn, field, tables)?);
    }

    Ok(format!(
        "    PgnInfo {{\n        pgn: {pgn_id},\n        description: {description},\n        \
         packet_type: {packet_type},\n        field_count: {field_count},\n        matcher: &[],\n        \
         repeating1: {repeating1},\n        repeating2: {repeating2},\n        fields: &[\n{fields_src}        ],\n    }},\n",
        pgn_id = pgn.pgn_id,
        field_count = pgn.fields.len(),
    ))
}

/// Generates the `PGN_TABLE` source text for every PGN the manifest lists.
pub(crate) fn generate(manifest: &Manifest, db: &serde_json::Value) -> Result<String, BuildError> {
    let tables = LookupTables::parse(db)?;
    let all_pgns: Vec<PgnInstructions> = serde_json::from_value(
        db.get("PGNs")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Array(Vec::new())),
    )?;

    let mut out = String::from("// Generated at build time from the bundled PGN database.\n");
    out.push_str("static PGN_TABLE: &[PgnInfo] = &[\n");
    for wanted in &manifest.pgns {
        let pgn = all_pgns
            .iter()
            .find(|p| p.pgn_id == wanted.id)
            .ok_or(BuildError::UnknownManifestPgn { pgn: wanted.id })?;
        out.push_str(&render_pgn(pgn, &tables)?);
    }
    out.push_str("];\n");
    Ok(out)
}
