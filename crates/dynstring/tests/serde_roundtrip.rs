#![expect(missing_docs)]

use dynstring::DString;

#[test]
fn serializes_content_cells_only() {
    let mut s = DString::from("Hi");
    s.reserve(32).unwrap();
    assert_eq!(serde_json::to_string(&s).unwrap(), "[72,105]");
}

#[test]
fn deserializes_like_from_cells() {
    let s: DString = serde_json::from_str("[72,105,0,33]").unwrap();
    assert_eq!(s.as_cells(), b"Hi");
    assert_eq!(s.capacity(), 4);

    let wide: DString<char> = serde_json::from_str(r#"["o","k"]"#).unwrap();
    assert_eq!(wide, "ok".chars().collect::<DString<char>>());
}

#[test]
fn round_trip_through_json() {
    let s = DString::from("round trip");
    let json = serde_json::to_string(&s).unwrap();
    let back: DString = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}
