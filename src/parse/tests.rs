// Parse module tests.

use super::*;

fn collect(set: &CandidateSet) -> Vec<&str> {
    set.iter().collect()
}

#[test]
fn test_parse_accepts_out_of_range_octets() {
    // No 0-255 range check on octets
    let set = parse_ips("foo 1.2.3.4 bar 999.999.999.999").expect("two candidates");
    assert_eq!(collect(&set), vec!["1.2.3.4", "999.999.999.999"]);
}

#[test]
fn test_parse_preserves_order_and_duplicates() {
    let set = parse_ips("8.8.8.8\n1.1.1.1, 8.8.8.8;10.0.0.1").expect("candidates");
    assert_eq!(
        collect(&set),
        vec!["8.8.8.8", "1.1.1.1", "8.8.8.8", "10.0.0.1"]
    );
    assert_eq!(set.len(), 4);
}

#[test]
fn test_parse_no_ips() {
    let result = parse_ips("nothing to see here 1.2.3 and 300");
    assert!(matches!(result, Err(InputError::NoIpsFound)));
    assert!(matches!(parse_ips(""), Err(InputError::NoIpsFound)));
}

#[test]
fn test_parse_word_boundaries() {
    // Four-digit groups do not match, and the match must sit on word boundaries
    let set = parse_ips("1234.1.1.1 src=192.168.0.1:443").expect("one candidate");
    assert_eq!(collect(&set), vec!["192.168.0.1"]);
}

#[test]
fn test_parse_embedded_in_structured_text() {
    let text = r#"{"src":"203.0.113.9","dst":"198.51.100.20"} | 2001:db8::1"#;
    let set = parse_ips(text).expect("candidates");
    assert_eq!(collect(&set), vec!["203.0.113.9", "198.51.100.20"]);
}

#[test]
fn test_candidate_set_is_restartable() {
    let set = parse_ips("1.1.1.1 2.2.2.2").expect("candidates");
    let first: Vec<&str> = set.iter().collect();
    let second: Vec<&str> = (&set).into_iter().collect();
    assert_eq!(first, second);
    assert!(!set.is_empty());
}
