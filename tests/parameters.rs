//! Parameter table extraction tests.

mod common;

use mphkit::params::parse_parameters;
use mphkit::{Container, Parameter, extract_parameters};

use common::{dmodel_xml, write_container, write_demo_container};

#[test]
fn test_demo_table() {
    let (_dir, path) = write_demo_container();
    assert_eq!(
        extract_parameters(&path),
        [Parameter::new("Voltage", "10[V]", "Supply voltage")]
    );
}

#[test]
fn test_missing_dmodel_is_empty_not_error() {
    let (_dir, path) = write_container("nodmodel.mph", &[("fileversion", &b"5.6"[..])]);
    assert!(extract_parameters(&path).is_empty());
}

#[test]
fn test_non_container_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.mph");
    std::fs::write(&path, [0u8; 64]).unwrap();
    assert!(extract_parameters(&path).is_empty());
}

#[test]
fn test_exclusion_rules_and_source_order() {
    let long_expr = "x".repeat(100);
    let almost_long = "y".repeat(99);
    let xml = dmodel_xml(&[
        ("L", "9[cm]", "Length"),
        ("currentiter", "1", "Iteration"),
        ("mesh", "Triangle(1)", "Mesh"),
        ("long", &long_expr, "Too long"),
        ("almost", &almost_long, "Just short enough"),
        ("W", "1[cm]", "Width"),
    ]);

    let names: Vec<String> = parse_parameters(&xml).into_iter().map(|p| p.name).collect();
    assert_eq!(names, ["L", "almost", "W"]);
}

#[test]
fn test_attribute_order_does_not_matter() {
    let xml = r#"<model>
        <expressions descr="Supply voltage" expr="10[V]" name="Voltage"/>
        <expressions expr='2' name='n' descr='count'></expressions>
    </model>"#;
    assert_eq!(
        parse_parameters(xml),
        [
            Parameter::new("Voltage", "10[V]", "Supply voltage"),
            Parameter::new("n", "2", "count"),
        ]
    );
}

#[test]
fn test_elements_missing_an_attribute_are_skipped() {
    let xml = r#"<model>
        <expressions name="a" expr="1"/>
        <expressions name="b" descr="no expr"/>
        <expressions expr="3" descr="no name"/>
        <expressions name="d" expr="4" descr=""/>
    </model>"#;
    assert_eq!(parse_parameters(xml), [Parameter::new("d", "4", "")]);
}

#[test]
fn test_values_are_unescaped() {
    let xml = r#"<m><expressions name="cond" expr="if(a&lt;b &amp;&amp; c&gt;0,1,0)" descr="&quot;q&quot;"/></m>"#;
    let table = parse_parameters(xml);
    assert_eq!(table[0].value, "if(a<b && c>0,1,0)");
    assert_eq!(table[0].description, "\"q\"");
}

#[test]
fn test_malformed_document_is_empty() {
    let xml = r#"<model><expressions name="a" expr="1" descr=""></model>"#;
    assert!(parse_parameters(xml).is_empty());
}

#[test]
fn test_non_utf8_dmodel_is_empty() {
    let (_dir, path) = write_container(
        "latin1.mph",
        &[("dmodel.xml", &b"<expressions name=\"T\" expr=\"20\xb0\" descr=\"\"/>"[..])],
    );
    assert!(extract_parameters(&path).is_empty());
}

#[test]
fn test_duplicate_names_are_all_reported() {
    let xml = dmodel_xml(&[("d", "1", "first"), ("d", "2", "second")]);
    let table = parse_parameters(&xml);
    assert_eq!(table.len(), 2);
    assert_eq!(table[1].description, "second");
}

#[test]
fn test_container_parameters_matches_free_function() {
    let (_dir, path) = write_demo_container();
    let mut container = Container::open(&path).unwrap();
    assert_eq!(container.parameters(), extract_parameters(&path));
}

#[test]
fn test_only_expressions_elements_are_parameters() {
    let xml = r#"<model>
  <param><expressions name="V" expr="10[V]" descr="Supply voltage"/></param>
  <variables><var name="T" expr="V*2" descr="local var"/></variables>
  <feature name="blk1" expr="x" descr="geometry"/>
</model>"#;
    let (_dir, path) = write_container("mixed.mph", &[("dmodel.xml", xml.as_bytes())]);
    assert_eq!(
        extract_parameters(&path),
        [Parameter::new("V", "10[V]", "Supply voltage")]
    );
}
