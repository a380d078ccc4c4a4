use crate::errors::Result;
use crate::runner::outcome::{Status, TestCase};
use crate::runner::structured::{DocumentFormatter, ReportDocument};
use quick_xml::{
    events::{BytesEnd, BytesStart, Event},
    Writer,
};

/// Renders a report as a `testExecutions` document with one `testCase`
/// element per test. Durations are whole milliseconds.
pub struct XmlFormatter;

impl DocumentFormatter for XmlFormatter {
    fn format(&self, document: &ReportDocument) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        let mut root = BytesStart::new("testExecutions");
        root.push_attribute(("version", "1"));
        writer.write_event(Event::Start(root))?;

        let mut file = BytesStart::new("file");
        file.push_attribute(("path", document.source.as_str()));
        writer.write_event(Event::Start(file))?;

        for case in &document.test_cases {
            serialize_test_case(case, &mut writer)?;
        }

        serialize_end_event("file", &mut writer)?;
        serialize_end_event("testExecutions", &mut writer)?;
        writer.write_indent()?;

        // Only `&str` content was written, so the buffer is valid UTF-8.
        Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
    }
}

fn serialize_test_case(case: &TestCase, writer: &mut Writer<impl std::io::Write>) -> Result<()> {
    let mut tag = BytesStart::new("testCase");
    tag.push_attribute(("name", case.description.as_str()));
    tag.push_attribute(("duration", case.duration_ms().to_string().as_str()));

    match case.status {
        Status::Pass => writer.write_event(Event::Empty(tag))?,
        Status::Failure | Status::Error => {
            writer.write_event(Event::Start(tag))?;
            let mut detail = BytesStart::new(case.status.as_str());
            detail.push_attribute(("message", case.message.as_str()));
            writer.write_event(Event::Empty(detail))?;
            serialize_end_event("testCase", writer)?;
        }
    }
    Ok(())
}

fn serialize_end_event(title: &str, writer: &mut Writer<impl std::io::Write>) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(title)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quick_xml::Reader;

    fn document(cases: Vec<TestCase>) -> ReportDocument {
        ReportDocument {
            suite: "default xml writer test".to_string(),
            source: "tests/xml.rs".to_string(),
            test_cases: cases,
            ..Default::default()
        }
    }

    #[test]
    fn test_layout() {
        let doc = document(vec![
            TestCase::new("test happy path", Status::Pass, "", 2_500_000),
            TestCase::new(
                "test error",
                Status::Failure,
                "expected is 'buzz', but actual is 'fizz'",
                999_999,
            ),
            TestCase::new("test unhandled error", Status::Error, "bad cast", 0),
        ]);

        let xml = XmlFormatter.format(&doc).unwrap();
        assert_eq!(
            xml,
            r#"<testExecutions version="1">
  <file path="tests/xml.rs">
    <testCase name="test happy path" duration="2"/>
    <testCase name="test error" duration="0">
      <failure message="expected is &apos;buzz&apos;, but actual is &apos;fizz&apos;"/>
    </testCase>
    <testCase name="test unhandled error" duration="0">
      <error message="bad cast"/>
    </testCase>
  </file>
</testExecutions>
"#
        );
    }

    #[test]
    fn test_empty_document() {
        let xml = XmlFormatter.format(&document(vec![])).unwrap();
        assert_eq!(
            xml,
            "<testExecutions version=\"1\">\n  <file path=\"tests/xml.rs\">\n  </file>\n</testExecutions>\n"
        );
    }

    #[test]
    fn test_escapes_ampersand_once() {
        let doc = document(vec![TestCase::new(
            r#"a & "b" <c>"#,
            Status::Error,
            "&amp;",
            0,
        )]);
        let xml = XmlFormatter.format(&doc).unwrap();
        assert!(xml.contains(r#"name="a &amp; &quot;b&quot; &lt;c&gt;""#));
        assert!(xml.contains(r#"message="&amp;amp;""#));
    }

    #[derive(Debug, PartialEq)]
    struct Parsed {
        name: String,
        duration: u64,
        status: String,
        message: Option<String>,
    }

    fn attribute(tag: &BytesStart<'_>, key: &str) -> String {
        tag.try_get_attribute(key)
            .unwrap()
            .unwrap()
            .unescape_value()
            .unwrap()
            .into_owned()
    }

    fn parse(xml: &str) -> Vec<Parsed> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut parsed: Vec<Parsed> = Vec::new();

        loop {
            match reader.read_event().unwrap() {
                Event::Start(tag) | Event::Empty(tag) => match tag.name().as_ref() {
                    b"testCase" => parsed.push(Parsed {
                        name: attribute(&tag, "name"),
                        duration: attribute(&tag, "duration").parse().unwrap(),
                        status: "pass".to_string(),
                        message: None,
                    }),
                    b"failure" | b"error" => {
                        let last = parsed.last_mut().unwrap();
                        last.status = String::from_utf8(tag.name().as_ref().to_vec()).unwrap();
                        last.message = Some(attribute(&tag, "message"));
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        parsed
    }

    #[test]
    fn test_round_trip() {
        let cases = vec![
            TestCase::new("passes <quickly>", Status::Pass, "", 7_654_321),
            TestCase::new("fails", Status::Failure, "it's \"wrong\" & bad", 1_000_000),
        ];
        let xml = XmlFormatter.format(&document(cases.clone())).unwrap();

        let parsed = parse(&xml);
        assert_eq!(
            parsed,
            vec![
                Parsed {
                    name: cases[0].description.clone(),
                    duration: cases[0].duration_ns / 1_000_000,
                    status: "pass".to_string(),
                    message: None,
                },
                Parsed {
                    name: cases[1].description.clone(),
                    duration: cases[1].duration_ns / 1_000_000,
                    status: "failure".to_string(),
                    message: Some(cases[1].message.clone()),
                },
            ]
        );
    }
}
