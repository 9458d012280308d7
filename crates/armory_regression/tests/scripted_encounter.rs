use armory_regression::scripted_trace;

#[test]
fn scripted_encounter_trace() {
    let trace = scripted_trace().unwrap();
    insta::assert_json_snapshot!("scripted_trace", trace);
}
