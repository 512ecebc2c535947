use provider::DeltaDecoder;

fn event(content: &str) -> String {
    format!("data: {{\"choices\":[{{\"delta\":{{\"content\":\"{content}\"}}}}]}}\n")
}

#[test]
fn decodes_one_delta_per_line() {
    let mut decoder = DeltaDecoder::new();
    let chunk = format!("{}{}", event("Hel"), event("lo"));
    assert_eq!(decoder.push(chunk.as_bytes()), vec!["Hel", "lo"]);
    assert!(!decoder.finished());
}

#[test]
fn reassembles_lines_split_across_chunks() {
    let mut decoder = DeltaDecoder::new();
    let line = event("fragment");
    let (head, tail) = line.split_at(17);
    assert!(decoder.push(head.as_bytes()).is_empty());
    assert_eq!(decoder.push(tail.as_bytes()), vec!["fragment"]);
}

#[test]
fn stops_at_the_done_marker() {
    let mut decoder = DeltaDecoder::new();
    let chunk = format!("{}data: [DONE]\n{}", event("hi"), event("late"));
    assert_eq!(decoder.push(chunk.as_bytes()), vec!["hi"]);
    assert!(decoder.finished());
    assert!(decoder.push(event("more").as_bytes()).is_empty());
}

#[test]
fn ignores_blank_lines_and_unparsable_events() {
    let mut decoder = DeltaDecoder::new();
    let chunk = format!("\n: keep-alive\ndata: not json\n{}", event("ok"));
    assert_eq!(decoder.push(chunk.as_bytes()), vec!["ok"]);
}

#[test]
fn close_discards_everything_after() {
    let mut decoder = DeltaDecoder::new();
    decoder.close();
    assert!(decoder.finished());
    assert!(decoder.push(event("dropped").as_bytes()).is_empty());
}
