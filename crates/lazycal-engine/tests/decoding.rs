use std::fs::File;
use std::io::BufReader;

use lazycal_engine::{DecodeError, Decoded, Decoder, Token};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> File {
    File::open(format!(
        "{}/tests/fixtures/{name}",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn calendar() -> Token {
    Decoder::new(fixture("team_calendar.ics"))
        .decode_calendar()
        .unwrap()
        .unwrap()
}

#[test]
fn calendar_top_level_children() {
    let cal = calendar();

    // 5 attributes, one VTIMEZONE and two VEVENTs at depth 1
    assert_eq!(cal.children.len(), 8);
    insta::assert_snapshot!(
        cal.to_string(),
        @"<VCALENDAR: VERSION=2.0, PRODID=-//lazycal//Fixture//EN, CALSCALE=GREGORIAN, X-WR-CALNAME=Team, X-WR-TIMEZONE=Europe/London, VTIMEZONE=, VEVENT=, VEVENT=>"
    );
}

#[test]
fn timezone_rules_keep_raw_values() {
    let cal = calendar();
    let tz = cal.subtoken("VTIMEZONE").unwrap();

    let kinds: Vec<_> = tz.children.iter().map(|c| c.kind.as_str()).collect();
    assert_eq!(kinds, vec!["TZID", "DAYLIGHT", "STANDARD"]);

    let daylight = tz.subtoken("DAYLIGHT").unwrap();
    assert_eq!(
        daylight.subtoken("RRULE").unwrap().value,
        "FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU"
    );
    assert!(daylight.subtoken("RRULE").unwrap().parameters.is_empty());
}

#[test]
fn event_attributes_unfolded() {
    let cal = calendar();
    let event = cal.subtoken("VEVENT").unwrap();

    assert_eq!(
        event.subtoken("DESCRIPTION").unwrap().value,
        "Daily sync\\, bring blockers\\; keep it short. Agenda at https://example.com/agenda?team=core"
    );

    let attendees: Vec<_> = event.subtokens("ATTENDEE").collect();
    assert_eq!(attendees.len(), 2);
    assert_eq!(
        attendees[0],
        &Token::attribute("ATTENDEE", "mailto:alex@example.com")
            .with_parameter("CN", "\"Alex Doe\"")
            .with_parameter("CUTYPE", "INDIVIDUAL")
            .with_parameter("PARTSTAT", "ACCEPTED")
            .with_parameter("ROLE", "REQ-PARTICIPANT")
    );

    let alarm = event.subtoken("VALARM").unwrap();
    assert_eq!(alarm.subtoken("DESCRIPTION").unwrap().value, "Reminder");
}

#[test]
fn second_event_via_all_children() {
    let cal = calendar();
    let last = cal.subtokens("VEVENT").last().unwrap();

    insta::assert_snapshot!(
        last.to_string(),
        @"<VEVENT: UID=8a2b-44, DTSTART(VALUE=DATE)=20240315, SUMMARY=Release day>"
    );
}

#[test]
fn tiny_read_buffer_gives_same_tree() {
    let reader = BufReader::with_capacity(1, fixture("team_calendar.ics"));
    let cal = Decoder::from_buf_read(reader)
        .decode_calendar()
        .unwrap()
        .unwrap();

    assert_eq!(cal, calendar());
}

#[test]
fn events_pulled_one_at_a_time() {
    let mut decoder = Decoder::new(fixture("team_calendar.ics"));

    let first = decoder.decode("VEVENT").unwrap().into_token().unwrap();
    let second = decoder.decode("VEVENT").unwrap().into_token().unwrap();

    assert_eq!(first.subtoken("SUMMARY").unwrap().value, "Stand-up");
    assert_eq!(second.subtoken("SUMMARY").unwrap().value, "Release day");
}

#[test]
fn nested_records_stop_at_enclosing_end() {
    let mut decoder = Decoder::new(fixture("team_calendar.ics"));

    let results: Vec<_> = decoder.records("VEVENT").collect();

    // Each call starts afresh, so END:VCALENDAR has nothing open to close
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok() && results[1].is_ok());
    assert!(matches!(
        &results[2],
        Err(DecodeError::UnbalancedEnd { line_number: 47, line }) if line == "END:VCALENDAR"
    ));
}

#[test]
fn contacts_iterate_until_end_of_stream() {
    let mut decoder = Decoder::new(fixture("contacts.vcf"));

    let names: Vec<_> = decoder
        .records("VCARD")
        .map(|card| card.unwrap().subtoken("FN").unwrap().value.clone())
        .collect();

    assert_eq!(names, vec!["Alex Doe", "Jo Ray", "Sam Lee"]);
    assert_eq!(decoder.decode("VCARD").unwrap(), Decoded::EndOfStream(None));
}

#[test]
fn contacts_crlf_and_folds_removed() {
    let mut decoder = Decoder::new(fixture("contacts.vcf"));
    let cards: Vec<_> = decoder.records("VCARD").map(Result::unwrap).collect();

    assert_eq!(
        cards[1].subtoken("NOTE").unwrap().value,
        "Prefers morning meetings and long walks"
    );
    insta::assert_snapshot!(
        cards[2].to_string(),
        @"<VCARD: VERSION=4.0, FN=Sam Lee, TEL(TYPE=cell,VALUE=uri)=tel:+44-20-7946-0000>"
    );
    for card in &cards {
        for child in &card.children {
            assert!(!child.value.contains('\r'), "{child:?}");
        }
    }
}
