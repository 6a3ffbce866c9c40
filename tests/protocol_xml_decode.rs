//! Integration tests for the legacy protocol XML reader.

use panink::ir::io_protocol_xml::from_protocol_str;
use panink::ir::MetaValue;

const SAMPLE_FILLED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<protocol code="000">
  <header>
    <layout layout="A" page="1"/>
  </header>
  <strokes start="0" stop="5000">
    <stroke x="2" y="4" time="500"/>
    <stroke x="4" y="7" time="1000"/>
    <stroke x="10" y="13" time="1500"/>
    <stroke x="12" y="14" time="2000"/>
    <stroke x="15" y="17" time="2500"/>
    <stroke x="16" y="18" time="3000"/>
    <stroke x="20" y="22" time="3500"/>
    <stroke x="20" y="24" time="4000"/>
    <stroke x="20" y="27" time="4500"/>
    <stroke x="20" y="28" time="5000"/>
  </strokes>
  <strokes begin="5000" end="10000">
    <stroke x="30" y="40" time="5500"/>
    <stroke x="31" y="40" time="6000"/>
    <stroke x="32" y="40" time="6500"/>
    <stroke x="33" y="40" time="7000"/>
    <stroke x="34" y="40" time="7500"/>
    <stroke x="35" y="40" time="8000"/>
    <stroke x="36" y="40" time="8500"/>
    <stroke x="37" y="40" time="9000"/>
    <stroke x="38" y="40" time="9500"/>
    <stroke x="39" y="40" time="10000"/>
  </strokes>
</protocol>
"#;

#[test]
fn header_metadata_and_computed_bounds() {
    let page = from_protocol_str(SAMPLE_FILLED).expect("parse protocol xml");

    assert_eq!(page.metadata.get("id"), Some(&MetaValue::from("000")));
    assert_eq!(page.metadata.get("noteType"), Some(&MetaValue::from("A")));
    assert_eq!(page.metadata.get("pageNo"), Some(&MetaValue::Int(1)));

    // No declared geometry: bounds are the sample extremes.
    assert_eq!(page.width, 39.0);
    assert_eq!(page.height, 40.0);

    assert_eq!(page.strokes.len(), 2);

    let first = &page.strokes[0];
    assert_eq!(first.start_time, 0);
    assert_eq!(first.end_time, 5000);
    assert_eq!(first.dots.len(), 10);
    assert_eq!(first.dots[0].x, Some(2.0));
    assert_eq!(first.dots[0].y, Some(4.0));
    assert_eq!(first.dots[0].timestamp, 500);

    let second = &page.strokes[1];
    assert_eq!(second.start_time, 5000);
    assert_eq!(second.end_time, 10_000);
    assert_eq!(second.dots[9].x, Some(39.0));
    assert_eq!(second.dots[9].timestamp, 10_000);
}

#[test]
fn unresolved_samples_do_not_widen_the_page() {
    let xml = r#"<protocol>
  <strokes start="0" stop="10">
    <stroke y="25" time="1"/>
    <stroke x="7" y="9" time="2"/>
  </strokes>
</protocol>"#;

    let page = from_protocol_str(xml).expect("parse protocol xml");
    assert_eq!(page.width, 7.0);
    assert_eq!(page.height, 25.0);
    assert_eq!(page.strokes[0].dots[0].x, None);
}

#[test]
fn unparseable_time_is_malformed() {
    let xml = r#"<protocol><strokes start="soon" stop="later"/></protocol>"#;
    assert!(from_protocol_str(xml).is_err());
}
