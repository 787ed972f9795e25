use std::collections::HashMap;
use std::path::Path;

use syxkit_core::{
    DataType, FormatRegistry, ParameterDefinition, SysexDefinition, SysexHeader, ACCESS_VIRUS,
};

fn bitfield_definition() -> SysexDefinition {
    let mut definition =
        SysexDefinition::new("Roundtrip Synth", SysexHeader::new(vec![0x00, 0x20, 0x33]));
    definition.total_length = Some(64);
    definition.preset_name_offset = Some(32);
    definition.preset_name_length = 16;
    definition.checksum_offset = Some(60);

    definition.insert_parameter(ParameterDefinition::new("cutoff", 10, "filter"));

    let mut wave = ParameterDefinition::new("wave", 11, "oscillator");
    wave.bit_mask = 0b0000_0111;
    wave.value_range = (0, 7);
    definition.insert_parameter(wave);

    let mut octave = ParameterDefinition::new("octave", 11, "oscillator");
    octave.bit_mask = 0b0111_0000;
    octave.bit_shift = 4;
    octave.value_range = (0, 7);
    definition.insert_parameter(octave);

    let mut bend = ParameterDefinition::new("bend_range", 14, "performance");
    bend.data_type = DataType::Uint16;
    bend.bit_mask = 0xFFFF;
    bend.value_range = (0, 0x3FFF);
    definition.insert_parameter(bend);

    definition
}

fn params(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

#[test]
fn every_raw_value_round_trips_exactly() {
    let definition = bitfield_definition();
    for param in definition.parameters.values() {
        let (min, max) = param.value_range;
        for raw in min..=max {
            assert_eq!(
                param.denormalize(param.normalize(raw)),
                raw,
                "{} does not round-trip {}",
                param.name,
                raw
            );
        }
    }
}

#[test]
fn encode_then_decode_reproduces_normalized_values() {
    let definition = bitfield_definition();
    let registry = {
        let mut registry = FormatRegistry::new();
        registry.register("roundtrip", definition);
        registry
    };
    let encoder = registry.get_encoder("roundtrip").unwrap();
    let decoder = registry.get_decoder("roundtrip").unwrap();

    let input = params(&[
        ("cutoff", 0.787),
        ("wave", 0.4),
        ("octave", 1.0),
        ("bend_range", 0.125),
    ]);
    let message = encoder.encode_preset(&input, "RT").unwrap();
    let preset = decoder.decode_message(&message).unwrap();

    for (name, &normalized) in &input {
        let param = &registry.definition("roundtrip").unwrap().parameters[name];
        let (min, max) = param.value_range;
        let quantum = 1.0 / (max - min) as f64;
        let decoded = preset.parameters[name].normalized_value;
        assert!(
            (decoded - normalized).abs() <= quantum / 2.0 + 1e-12,
            "{}: {} vs {}",
            name,
            decoded,
            normalized
        );
    }
}

#[test]
fn shared_byte_fields_are_isolated() {
    let definition = bitfield_definition();
    let registry = {
        let mut registry = FormatRegistry::new();
        registry.register("roundtrip", definition);
        registry
    };
    let encoder = registry.get_encoder("roundtrip").unwrap();
    let decoder = registry.get_decoder("roundtrip").unwrap();

    let message = encoder
        .encode_preset(&params(&[("wave", 5.0 / 7.0), ("octave", 3.0 / 7.0)]), "RT")
        .unwrap();
    let preset = decoder.decode_message(&message).unwrap();
    assert_eq!(preset.parameters["wave"].raw_value, 5);
    assert_eq!(preset.parameters["octave"].raw_value, 3);
}

#[test]
fn encoder_output_passes_checksum_verification() {
    let definition = bitfield_definition();
    let registry = {
        let mut registry = FormatRegistry::new();
        registry.register("roundtrip", definition);
        registry
    };
    let encoder = registry.get_encoder("roundtrip").unwrap();
    let decoder = registry.get_decoder("roundtrip").unwrap();

    let message = encoder
        .encode_preset(&params(&[("cutoff", 0.9), ("wave", 1.0)]), "Bass1")
        .unwrap();
    let preset = decoder.decode_message(&message).unwrap();
    assert_eq!(preset.metadata.checksum_valid, Some(true));
}

#[test]
fn preset_name_round_trips_without_padding() {
    let definition = bitfield_definition();
    let registry = {
        let mut registry = FormatRegistry::new();
        registry.register("roundtrip", definition);
        registry
    };
    let encoder = registry.get_encoder("roundtrip").unwrap();
    let decoder = registry.get_decoder("roundtrip").unwrap();

    let message = encoder.encode_preset(&HashMap::new(), "Bass1").unwrap();
    let preset = decoder.decode_message(&message).unwrap();
    assert_eq!(preset.metadata.preset_name.as_deref(), Some("Bass1"));
}

#[test]
fn decode_file_returns_presets_in_stream_order() {
    let registry = FormatRegistry::new();
    let decoder = registry.get_decoder(ACCESS_VIRUS).unwrap();
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("virus_bank.syx");

    let presets = decoder.decode_file(&fixture).expect("decode fixture");
    assert_eq!(presets.len(), 2);
    assert_eq!(presets[0].parameters["filter_cutoff"].raw_value, 100);
    assert_eq!(presets[0].metadata.preset_name.as_deref(), Some("Bass1"));
    assert_eq!(presets[1].parameters["filter_cutoff"].raw_value, 64);
    assert_eq!(presets[1].metadata.preset_name.as_deref(), Some("Lead2"));
}

#[test]
fn builtin_definition_decodes_spec_scenario() {
    let registry = FormatRegistry::new();
    let decoder = registry.get_decoder(ACCESS_VIRUS).unwrap();

    let mut message = vec![0u8; 256];
    message[0] = 0xF0;
    message[1..4].copy_from_slice(&[0x00, 0x20, 0x33]);
    message[40] = 100;
    message[255] = 0xF7;

    let preset = decoder.decode_message(&message).expect("header matches");
    let cutoff = &preset.parameters["filter_cutoff"];
    assert_eq!(cutoff.raw_value, 100);
    assert!((cutoff.normalized_value - 0.787).abs() < 1e-3);

    message[3] = 0x34;
    assert!(decoder.decode_message(&message).is_none());
}

#[test]
fn encode_half_cutoff_writes_sixty_four() {
    let registry = FormatRegistry::new();
    let encoder = registry.get_encoder(ACCESS_VIRUS).unwrap();
    let message = encoder
        .encode_preset(&params(&[("filter_cutoff", 0.5)]), "Custom")
        .unwrap();
    assert_eq!(message[40], 64);
}
