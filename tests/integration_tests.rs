//! Integration tests for the logger facade
//!
//! These tests verify:
//! - JSON entries carry the identity fields
//! - Output level filtering, including the Undefined level
//! - Log type and field overlays on derived loggers
//! - Format switching keeps standing fields
//! - Text output quoting

use chrono::DateTime;
use scope_logger::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FAKE_LOGGER_NAME: &str = "fakeLogger";

fn test_logger(buffer: &SharedBuffer) -> Logger {
    let logger = Logger::new(FAKE_LOGGER_NAME);
    logger.set_writer(buffer.clone());
    logger.set_exit_hook(|_| {}); // don't quit the test
    logger
}

fn parse(line: &str) -> serde_json::Value {
    serde_json::from_str(line).expect("line should be valid JSON")
}

fn has_token(line: &str, token: &str) -> bool {
    line.split(' ').any(|part| part == token)
}

fn has_key(line: &str, key: &str) -> bool {
    let prefix = format!("{}=", key);
    line.split(' ').any(|part| part.starts_with(&prefix))
}

#[test]
fn test_enable_json_keeps_standing_fields() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    let expected_host = gethostname_for_test();

    logger.enable_json_output(true);
    assert!(logger.is_json_output());
    assert_eq!(logger.scope(), FAKE_LOGGER_NAME);
    assert_eq!(logger.log_type(), LOG_TYPE_LOG);
    assert_eq!(logger.instance().as_deref(), Some(expected_host.as_str()));

    logger.enable_json_output(false);
    assert!(!logger.is_json_output());
    assert_eq!(logger.scope(), FAKE_LOGGER_NAME);
    assert_eq!(logger.log_type(), LOG_TYPE_LOG);
    assert_eq!(logger.instance().as_deref(), Some(expected_host.as_str()));
}

fn gethostname_for_test() -> String {
    // a fresh logger reports the host it runs on
    Logger::new("probe").instance().unwrap_or_default()
}

#[test]
fn test_json_logger_fields() {
    type LogFn = fn(&Logger, &str);
    let cases: [(&str, LogLevel, &str, LogFn); 10] = [
        ("info()", LogLevel::Info, "info", |l: &Logger, m: &str| l.info(m)),
        ("infof()", LogLevel::Info, "info", |l: &Logger, m: &str| l.infof(format_args!("{}", m))),
        ("debug()", LogLevel::Debug, "debug", |l: &Logger, m: &str| l.debug(m)),
        ("debugf()", LogLevel::Debug, "debug", |l: &Logger, m: &str| l.debugf(format_args!("{}", m))),
        ("warn()", LogLevel::Info, "warn", |l: &Logger, m: &str| l.warn(m)),
        ("warnf()", LogLevel::Info, "warn", |l: &Logger, m: &str| l.warnf(format_args!("{}", m))),
        ("error()", LogLevel::Info, "error", |l: &Logger, m: &str| l.error(m)),
        ("errorf()", LogLevel::Info, "error", |l: &Logger, m: &str| l.errorf(format_args!("{}", m))),
        ("fatal()", LogLevel::Info, "fatal", |l: &Logger, m: &str| l.fatal(m)),
        ("fatalf()", LogLevel::Info, "fatal", |l: &Logger, m: &str| l.fatalf(format_args!("{}", m))),
    ];

    for (name, output_level, level, log_fn) in cases {
        let buffer = SharedBuffer::new();
        let logger = test_logger(&buffer);
        logger.enable_json_output(true);
        logger.set_app_id("scoped_app");
        logger.set_version("scoped_app");
        logger.set_output_level(output_level);
        logger.set_instance("scoped-pod");

        log_fn(&logger, "King Scope");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1, "{}: expected exactly one line", name);
        let o = parse(&lines[0]);

        assert_eq!(o["app_id"], "scoped_app", "{}", name);
        assert_eq!(o["ver"], "scoped_app", "{}", name);
        assert_eq!(o["instance"], "scoped-pod", "{}", name);
        assert_eq!(o["level"], level, "{}", name);
        assert_eq!(o["type"], LOG_TYPE_LOG, "{}", name);
        assert_eq!(o["scope"], FAKE_LOGGER_NAME, "{}", name);
        assert_eq!(o["msg"], "King Scope", "{}", name);
        let time = o["time"].as_str().expect("time is a string");
        assert!(DateTime::parse_from_rfc3339(time).is_ok(), "{}: bad time {}", name, time);
    }
}

#[test]
fn test_output_level() {
    let levels = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Undefined,
    ];

    for output_level in levels {
        for level in LogLevel::SEVERITIES {
            let want = output_level != LogLevel::Undefined && level >= output_level;

            let buffer = SharedBuffer::new();
            let exits = Arc::new(AtomicUsize::new(0));
            let counter = Arc::clone(&exits);
            let logger = test_logger(&buffer);
            logger.set_exit_hook(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            logger.set_output_level(output_level);

            assert_eq!(
                logger.is_output_level_enabled(level),
                want,
                "output={} level={}",
                output_level,
                level
            );

            match level {
                LogLevel::Debug => logger.debug(""),
                LogLevel::Info => logger.info(""),
                LogLevel::Warn => logger.warn(""),
                LogLevel::Error => logger.error(""),
                LogLevel::Fatal => logger.fatal(""),
                LogLevel::Undefined => unreachable!(),
            }

            if want {
                assert!(!buffer.is_empty(), "expected to log {} at {}", level, output_level);
            } else {
                assert!(buffer.is_empty(), "expected to not log {} at {}", level, output_level);
            }

            let expected_exits = usize::from(want && level == LogLevel::Fatal);
            assert_eq!(exits.load(Ordering::SeqCst), expected_exits);
        }
    }
}

#[test]
fn test_with_log_type() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(true);
    logger.set_app_id("scoped_app");
    logger.set_output_level(LogLevel::Info);

    // the derived logger uses the request type, the parent keeps the default
    let request_logger = logger.with_log_type(LOG_TYPE_REQUEST);
    request_logger.info("call user app");
    logger.info("logger with log type");

    let lines = buffer.lines();
    assert_eq!(parse(&lines[0])["type"], LOG_TYPE_REQUEST);
    assert_eq!(parse(&lines[1])["type"], LOG_TYPE_LOG);
    assert_eq!(request_logger.log_type(), LOG_TYPE_REQUEST);
    assert_eq!(logger.log_type(), LOG_TYPE_LOG);
}

#[test]
fn test_with_fields_json() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(true);
    logger.set_app_id("scoped_app");
    logger.set_output_level(LogLevel::Info);

    let mut fields: HashMap<&str, FieldValue> = HashMap::new();
    fields.insert("answer", 42.into());
    fields.insert("hello", "world".into());
    logger.with_fields(fields).info("🙃");

    let o = parse(&buffer.take());
    assert_eq!(o["msg"], "🙃");
    assert_eq!(o["hello"], "world");
    assert_eq!(o["answer"], 42);

    logger
        .with_fields([("🤌", vec!["👍", "🚀"])])
        .info("🐶");

    let o = parse(&buffer.take());
    assert_eq!(o["msg"], "🐶");
    assert_eq!(o["🤌"], serde_json::json!(["👍", "🚀"]));
    assert!(o.get("hello").is_none());
    assert!(o.get("answer").is_none());

    // the parent still only has its own fields
    logger.info("🤔");

    let o = parse(&buffer.take());
    assert_eq!(o["msg"], "🤔");
    assert!(o.get("hello").is_none());
    assert!(o.get("answer").is_none());
}

#[test]
fn test_with_fields_text() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(false);
    logger.set_app_id("scoped_app");
    logger.set_output_level(LogLevel::Info);

    logger
        .with_fields(Fields::new().with_field("answer", 42).with_field("hello", "world"))
        .info("🙃");

    let line = buffer.take();
    let line = line.trim_end();
    assert!(has_token(line, "msg=\"🙃\""));
    assert!(has_token(line, "answer=42"));
    assert!(has_token(line, "hello=world"));
    assert!(has_token(line, "app_id=scoped_app"));
    assert!(has_token(line, "scope=fakeLogger"));
    assert!(has_token(line, "type=log"));

    logger
        .with_fields([("🤌", vec!["👍", "🚀"])])
        .info("🐶");

    let line = buffer.take();
    let line = line.trim_end();
    assert!(has_token(line, "msg=\"🐶\""));
    assert!(line.contains(" 🤌=\"[👍 🚀]\""));
    assert!(!has_key(line, "answer"));
    assert!(!has_key(line, "hello"));

    logger.info("🤔");

    let line = buffer.take();
    let line = line.trim_end();
    assert!(has_token(line, "msg=\"🤔\""));
    assert!(!has_key(line, "answer"));
    assert!(!has_key(line, "hello"));
}

#[test]
fn test_nested_with_fields_union() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(true);

    let first = logger.with_fields([("a", "1"), ("shared", "first")]);
    let second = first.with_fields([("b", "2"), ("shared", "second")]);
    let sibling = logger.with_fields([("c", "3")]);

    second.info("nested");
    sibling.info("sibling");
    first.info("first");

    let lines = buffer.lines();
    let nested = parse(&lines[0]);
    assert_eq!(nested["a"], "1");
    assert_eq!(nested["b"], "2");
    assert_eq!(nested["shared"], "second");

    let sibling = parse(&lines[1]);
    assert_eq!(sibling["c"], "3");
    assert!(sibling.get("a").is_none());
    assert!(sibling.get("shared").is_none());

    let first = parse(&lines[2]);
    assert_eq!(first["shared"], "first");
    assert!(first.get("b").is_none());
}

#[test]
fn test_format_switch_preserves_standing_fields() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.set_app_id("app1");
    logger.set_instance("pod-1");

    logger.enable_json_output(true);
    logger.info("as json");
    logger.enable_json_output(false);
    logger.info("as text");

    let lines = buffer.lines();
    let json = parse(&lines[0]);
    assert_eq!(json["scope"], FAKE_LOGGER_NAME);
    assert_eq!(json["instance"], "pod-1");
    assert_eq!(json["app_id"], "app1");

    assert!(has_token(&lines[1], "scope=fakeLogger"));
    assert!(has_token(&lines[1], "instance=pod-1"));
    assert!(has_token(&lines[1], "app_id=app1"));
    assert!(has_token(&lines[1], "msg=\"as text\""));
}

#[test]
fn test_svc_scenario() {
    let buffer = SharedBuffer::new();
    let logger = Logger::builder()
        .output_level(LogLevel::Info)
        .json(true)
        .app_id("app1")
        .instance("pod-1")
        .writer(buffer.clone())
        .build("svc");

    logger.info("hello");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let o = parse(&lines[0]);
    assert_eq!(o["level"], "info");
    assert_eq!(o["msg"], "hello");
    assert_eq!(o["scope"], "svc");
    assert_eq!(o["app_id"], "app1");
    assert_eq!(o["instance"], "pod-1");
    assert_eq!(o["type"], "log");
    assert!(DateTime::parse_from_rfc3339(o["time"].as_str().unwrap()).is_ok());

    logger.set_output_level(LogLevel::Warn);
    logger.debug("x");
    assert_eq!(buffer.lines().len(), 1);
}

#[test]
fn test_text_quotes_spaces_and_quotes() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);

    logger
        .with_fields([("path", "/a b"), ("quote", "say \"hi\"")])
        .info("quoted values");

    let line = buffer.contents();
    assert!(line.contains(" path=\"/a b\""));
    assert!(line.contains(r#" quote="say \"hi\"""#));
    assert!(line.starts_with("time=\""));
    assert!(line.contains(" level=info "));
}

#[test]
fn test_log_injection_prevention() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(true);

    let message = "User login\nlevel=error msg=\"fake\"\r\n\tINFO Continuation";
    logger.info(message);

    assert_eq!(buffer.lines().len(), 1, "entry should stay on one line");
    let o = parse(&buffer.contents());
    assert_eq!(o["msg"], message);

    buffer.take();
    logger.enable_json_output(false);
    logger.info(message);

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1, "text entry should stay on one line");
    assert!(lines[0].contains(r#" msg="User login\nlevel=error msg=\"fake\"\r\n\tINFO Continuation""#));
    assert!(!lines[0].contains(" level=error"));
}

#[test]
fn test_reserved_keys_are_not_shadowed() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(true);

    logger
        .with_fields([("msg", "spoof"), ("time", "never")])
        .warn("real");

    let o = parse(&buffer.contents());
    assert_eq!(o["msg"], "real");
    assert_ne!(o["time"], "never");
    assert_eq!(o["fields.msg"], "spoof");
    assert_eq!(o["fields.time"], "never");
}

#[test]
fn test_reserved_key_rename_does_not_clobber_caller_field() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(true);

    logger
        .with_fields([("fields.msg", "mine"), ("msg", "spoof")])
        .info("real");

    let o = parse(&buffer.contents());
    assert_eq!(o["msg"], "real");
    assert_eq!(o["fields.msg"], "mine");
    assert_eq!(o["fields.fields.msg"], "spoof");
}

#[test]
fn test_json_round_trip_of_scalars() {
    let buffer = SharedBuffer::new();
    let logger = test_logger(&buffer);
    logger.enable_json_output(true);
    logger.set_instance("node-7");

    logger
        .with_fields(
            Fields::new()
                .with_field("user", "a b \"c\"")
                .with_field("count", -17)
                .with_field("ratio", 1.5)
                .with_field("big", u64::MAX),
        )
        .info("round trip");

    let o = parse(&buffer.contents());
    assert_eq!(o["msg"], "round trip");
    assert_eq!(o["scope"], FAKE_LOGGER_NAME);
    assert_eq!(o["type"], "log");
    assert_eq!(o["instance"], "node-7");
    assert_eq!(o["user"], "a b \"c\"");
    assert_eq!(o["count"], -17);
    assert_eq!(o["ratio"], 1.5);
    assert_eq!(o["big"], u64::MAX);
}

#[test]
fn test_registry_end_to_end() {
    let registry = LoggerRegistry::new();
    let buffer = SharedBuffer::new();

    let runtime = registry.logger("runtime");
    runtime.set_writer(buffer.clone());

    let options = LoggerOptions::from_json(
        r#"{"app_id":"orders","json_format_enabled":true,"output_level":"warn","version":"1.4.0"}"#,
    )
    .unwrap();
    registry.apply_options(&options).unwrap();

    runtime.info("filtered");
    registry.logger("RUNTIME").warn("kept");

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let o = parse(&lines[0]);
    assert_eq!(o["msg"], "kept");
    assert_eq!(o["app_id"], "orders");
    assert_eq!(o["ver"], "1.4.0");
}
