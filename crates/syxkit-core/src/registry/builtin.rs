use crate::definition::types::{ParameterDefinition, SysexDefinition, SysexHeader};

/// Access Virus C single-dump layout.
///
/// Offsets follow the reverse-engineered parameter map the analysis tooling
/// was built against; the preset name location is approximate.
pub(crate) fn access_virus() -> SysexDefinition {
    let mut header = SysexHeader::new(vec![0x00, 0x20, 0x33]); // Access Music
    header.device_id = Some(0x01);
    header.model_id = Some(0x00);

    let mut definition = SysexDefinition::new("Access Virus C", header);
    definition.preset_name_offset = Some(200);
    definition.preset_name_length = 16;
    definition.total_length = Some(256);

    let parameters = [
        // Oscillators
        ParameterDefinition::new("osc1_octave", 16, "oscillator"),
        ParameterDefinition::new("osc1_semitone", 17, "oscillator"),
        ParameterDefinition::new("osc1_detune", 18, "oscillator"),
        ParameterDefinition::new("osc1_shape", 20, "oscillator"),
        ParameterDefinition::new("osc1_pw", 21, "oscillator"),
        ParameterDefinition::new("osc2_octave", 22, "oscillator"),
        ParameterDefinition::new("osc2_semitone", 23, "oscillator"),
        ParameterDefinition::new("osc2_detune", 24, "oscillator"),
        ParameterDefinition::new("osc2_shape", 26, "oscillator"),
        ParameterDefinition::new("osc2_pw", 27, "oscillator"),
        ParameterDefinition::new("osc_mix", 28, "oscillator"),
        ParameterDefinition::new("sub_osc_level", 29, "oscillator"),
        ParameterDefinition::new("noise_level", 30, "oscillator"),
        // Filter
        ParameterDefinition::with_cc("filter_cutoff", 40, "filter", 74),
        ParameterDefinition::with_cc("filter_resonance", 41, "filter", 71),
        ParameterDefinition::with_cc("filter_env_amount", 42, "filter", 72),
        ParameterDefinition::new("filter_type", 45, "filter"),
        ParameterDefinition::new("filter_saturation", 46, "filter"),
        // Envelopes
        ParameterDefinition::new("filter_env_attack", 60, "envelope"),
        ParameterDefinition::new("filter_env_decay", 61, "envelope"),
        ParameterDefinition::new("filter_env_sustain", 62, "envelope"),
        ParameterDefinition::new("filter_env_release", 63, "envelope"),
        ParameterDefinition::new("amp_env_attack", 64, "envelope"),
        ParameterDefinition::new("amp_env_decay", 65, "envelope"),
        ParameterDefinition::new("amp_env_sustain", 66, "envelope"),
        ParameterDefinition::new("amp_env_release", 67, "envelope"),
        // LFO
        ParameterDefinition::with_cc("lfo1_rate", 70, "lfo", 76),
        ParameterDefinition::new("lfo1_shape", 71, "lfo"),
        ParameterDefinition::with_cc("lfo1_amount", 72, "lfo", 77),
        ParameterDefinition::new("lfo1_sync", 73, "lfo"),
        // Effects
        ParameterDefinition::with_cc("chorus_rate", 90, "effects", 93),
        ParameterDefinition::with_cc("delay_time", 92, "effects", 94),
        ParameterDefinition::new("delay_feedback", 93, "effects"),
        ParameterDefinition::with_cc("distortion_amount", 95, "effects", 80),
    ];
    for parameter in parameters {
        definition.insert_parameter(parameter);
    }

    definition
}
