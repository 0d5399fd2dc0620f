//! Tests for country and region resolution


/// `(code, group label)` entries the way upstream lists them
pub fn entries(codes: &[&str]) -> Vec<(String, String)> {
    codes
        .iter()
        .enumerate()
        .map(|(index, code)| (code.to_string(), format!("{}#{}", code, index)))
        .collect()
}
