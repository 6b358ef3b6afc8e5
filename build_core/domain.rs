//! Deserialization shapes for the PGN manifest and the offline PGN database
//! (`build_core/var/`), plus small normalization helpers the generator uses
//! to turn a database entry into catalog source text.
use serde::Deserialize;

//==================================================================================MANIFEST
#[derive(Debug, Deserialize)]
/// Manifest describing which PGNs must be generated.
pub(crate) struct Manifest {
    pub(crate) pgns: Vec<Pgn>,
}

#[derive(Debug, Deserialize)]
/// Entry in the PGN list to generate.
pub(crate) struct Pgn {
    pub(crate) id: u32,
}

//==================================================================================LOOKUP_ENUMERATIONS
#[derive(Debug, Deserialize)]
pub(crate) struct LookupEnum {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "EnumValues")]
    pub(crate) enum_values: Vec<EnumValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnumValue {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Value")]
    pub(crate) value: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupIndirectEnum {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "EnumValues")]
    pub(crate) enum_values: Vec<IndirectEnumValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IndirectEnumValue {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Value1")]
    pub(crate) value1: i64,
    #[serde(rename = "Value2")]
    pub(crate) value2: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupBitEnum {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "EnumBitValues")]
    pub(crate) bit_values: Vec<BitEnumValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BitEnumValue {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Bit")]
    pub(crate) bit: u8,
}

/// Code -> field-type-name table for fields whose runtime shape is picked
/// dynamically by a preceding code (`Lookup::FieldType`), same code->name
/// shape as `LookupEnum`.
#[derive(Debug, Deserialize)]
pub(crate) struct LookupFieldTypeEnum {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "EnumValues")]
    pub(crate) enum_values: Vec<FieldTypeEnumValue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldTypeEnumValue {
    #[serde(rename = "Name")]
    pub(crate) name: String,
    #[serde(rename = "Value")]
    pub(crate) value: i64,
}

//==================================================================================PGN_DOMAIN
#[derive(Debug, Deserialize)]
/// Full PGN descriptor, shaped after the CANboat database schema.
pub(crate) struct PgnInstructions {
    #[serde(rename = "PGN")]
    pub pgn_id: u32,
    #[serde(rename = "Description")]
    pub pgn_description: String,
    #[serde(rename = "Type")]
    pub fastpacket: String,
    #[serde(rename = "RepeatingFieldSet1Size")]
    pub repeating_field_set_1_size: Option<u16>,
    #[serde(rename = "RepeatingFieldSet1StartField")]
    pub repeating_field_set_1_start_field: Option<u16>,
    #[serde(rename = "RepeatingFieldSet1CountField")]
    pub repeating_field_set_1_count_field: Option<u16>,
    #[serde(rename = "RepeatingFieldSet2Size")]
    pub repeating_field_set_2_size: Option<u16>,
    #[serde(rename = "RepeatingFieldSet2StartField")]
    pub repeating_field_set_2_start_field: Option<u16>,
    #[serde(rename = "RepeatingFieldSet2CountField")]
    pub repeating_field_set_2_count_field: Option<u16>,
    #[serde(rename = "Fields")]
    pub fields: Vec<Fields>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
/// Field descriptor, shaped after the CANboat database schema. `proprietary`
/// and `missing_value_is_one` are metadata this crate's curated database adds
/// on top of the upstream schema (upstream infers both from convention; we
/// record them explicitly since the bundled database is hand-maintained).
pub(crate) struct Fields {
    #[serde(rename = "Order")]
    pub order: u16,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FieldType")]
    pub kind: String,
    #[serde(rename = "BitLength")]
    pub bits_length: Option<u16>,
    #[serde(rename = "Signed")]
    pub signed: Option<bool>,
    #[serde(rename = "Resolution")]
    pub resolution: Option<f64>,
    #[serde(rename = "LookupEnumeration")]
    pub enum_direct_name: Option<String>,
    #[serde(rename = "LookupIndirectEnumeration")]
    pub enum_indirect_name: Option<String>,
    #[serde(rename = "LookupIndirectEnumerationFieldOrder")]
    pub enum_indirect_field_order: Option<u16>,
    #[serde(rename = "LookupBitEnumeration")]
    pub enum_bit_name: Option<String>,
    #[serde(rename = "LookupFieldTypeEnumeration")]
    pub enum_fieldtype_name: Option<String>,
    #[serde(rename = "Unit")]
    pub unit: Option<String>,
    #[serde(rename = "Proprietary", default)]
    pub proprietary: bool,
    #[serde(rename = "MissingValueIsOne", default = "default_true")]
    pub missing_value_is_one: bool,
}
