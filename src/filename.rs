/// Suffix appended to a sensor log to name its framed counterpart.
pub const OUTPUT_SUFFIX: &str = ".out";

/// The framed output sits next to the input: `sensor.bin` -> `sensor.bin.out`.
pub fn output_file_name(input: &str) -> String {
    format!("{}{}", input, OUTPUT_SUFFIX)
}

/// Recovers the sensor log name from a framed file name.
/// Returns None for names that do not carry the output suffix.
pub fn parse_output_file_name(fname: &str) -> Option<&str> {
    match fname.strip_suffix(OUTPUT_SUFFIX) {
        Some(input) if !input.is_empty() => Some(input),
        _ => None,
    }
}
