use std::{
    fs, io,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    thread,
    time::Duration,
};

use baton_log::{format_record, Level, LogError, Logger, RecordSink};
use parking_lot::Mutex;

// Polls `cond` for up to two seconds, giving the writer thread time
// to drain.
fn wait_for(cond: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

#[derive(Clone, Default)]
struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.lines.lock().push(line.to_owned());
        Ok(())
    }
}

#[test]
fn threshold_filters_records() -> Result<(), LogError> {
    let sink = MemorySink::default();
    let logger = Logger::with_sink(Level::Warn, Box::new(sink.clone()))?;

    logger.write(Level::Debug, "dropped");
    logger.write(Level::Info, "dropped");
    logger.write(Level::Warn, "kept warn");
    logger.write(Level::Error, "kept error");
    logger.write(Level::Fatal, "kept fatal");

    assert!(wait_for(|| sink.lines().len() == 3));

    let lines = sink.lines();
    assert!(lines[0].contains("[WARN] kept warn"));
    assert!(lines[1].contains("[ERROR] kept error"));
    assert!(lines[2].contains("[FATAL] kept fatal"));
    assert!(!lines.iter().any(|line| line.contains("dropped")));

    Ok(())
}

#[test]
fn fatal_only_threshold_keeps_fatal() -> Result<(), LogError> {
    let sink = MemorySink::default();
    let logger = Logger::with_sink(Level::Fatal, Box::new(sink.clone()))?;

    logger.write(Level::Error, "dropped");
    logger.write(Level::Fatal, "kept");

    assert!(wait_for(|| sink.lines().len() == 1));
    assert!(sink.lines()[0].ends_with("[FATAL] kept"));

    Ok(())
}

#[test]
fn record_format_is_timestamp_tag_message() {
    let line = format_record(Level::Info, "hello world");

    assert!(line.ends_with(" [INFO] hello world"));
    assert_eq!(line.len(), 19 + " [INFO] hello world".len());

    // The prefix is a local wall-clock timestamp.
    let parsed =
        chrono::NaiveDateTime::parse_from_str(&line[..19], "%Y-%m-%d %H:%M:%S");
    assert!(parsed.is_ok());
}

#[test]
fn records_drain_in_submission_order() -> Result<(), LogError> {
    let sink = MemorySink::default();
    let logger = Logger::with_sink(Level::Debug, Box::new(sink.clone()))?;

    for i in 0..50 {
        logger.write(Level::Info, &format!("record {i}"));
    }

    assert!(wait_for(|| sink.lines().len() == 50));
    for (i, line) in sink.lines().iter().enumerate() {
        assert!(line.ends_with(&format!("record {i}")));
    }

    Ok(())
}

#[test]
fn restart_flushes_records_buffered_across_the_stop() -> Result<(), LogError> {
    let sink = MemorySink::default();
    let logger = Logger::with_sink(Level::Debug, Box::new(sink.clone()))?;

    logger.write(Level::Info, "one");
    logger.write(Level::Info, "two");
    logger.write(Level::Info, "three");
    logger.stop();
    assert!(!logger.is_running());

    // Whatever the writer did not reach before the stop is flushed
    // by the writer spawned here.
    logger.start()?;
    assert!(wait_for(|| sink.lines().len() == 3));

    let lines = sink.lines();
    assert!(lines[0].ends_with("one"));
    assert!(lines[1].ends_with("two"));
    assert!(lines[2].ends_with("three"));

    Ok(())
}

#[test]
fn records_offered_while_stopped_are_discarded() -> Result<(), LogError> {
    let sink = MemorySink::default();
    let logger = Logger::with_sink(Level::Debug, Box::new(sink.clone()))?;

    logger.write(Level::Info, "before");
    assert!(wait_for(|| sink.lines().len() == 1));

    logger.stop();
    logger.write(Level::Info, "while stopped");
    logger.start()?;
    logger.write(Level::Info, "after");

    assert!(wait_for(|| sink.lines().len() == 2));
    let lines = sink.lines();
    assert!(lines[1].ends_with("after"));
    assert!(!lines.iter().any(|line| line.contains("while stopped")));

    Ok(())
}

#[test]
fn set_threshold_applies_to_subsequent_records() -> Result<(), LogError> {
    let sink = MemorySink::default();
    let logger = Logger::with_sink(Level::Debug, Box::new(sink.clone()))?;

    logger.write(Level::Debug, "verbose one");
    logger.set_threshold(Level::Error);
    assert_eq!(logger.threshold(), Level::Error);

    logger.write(Level::Debug, "verbose two");
    logger.write(Level::Error, "problem");

    assert!(wait_for(|| sink.lines().len() == 2));
    let lines = sink.lines();
    assert!(lines[0].ends_with("verbose one"));
    assert!(lines[1].ends_with("problem"));

    Ok(())
}

#[test]
fn set_path_redirects_subsequent_records() -> Result<(), LogError> {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    let logger = Logger::to_file(Level::Debug, &first)?;
    assert_eq!(logger.path().as_deref(), Some(first.as_path()));

    logger.write(Level::Info, "goes first");
    assert!(wait_for(|| {
        fs::read_to_string(&first).is_ok_and(|s| s.contains("goes first"))
    }));

    logger.set_path(&second)?;
    assert_eq!(logger.path().as_deref(), Some(second.as_path()));

    logger.write(Level::Info, "goes second");
    assert!(wait_for(|| {
        fs::read_to_string(&second).is_ok_and(|s| s.contains("goes second"))
    }));
    assert!(!fs::read_to_string(&first).unwrap().contains("goes second"));

    Ok(())
}

#[test]
fn failed_set_path_keeps_the_previous_sink() -> Result<(), LogError> {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.log");
    let bad = dir.path().join("no-such-dir").join("bad.log");

    let logger = Logger::to_file(Level::Debug, &good)?;
    assert!(matches!(logger.set_path(&bad), Err(LogError::Open { .. })));
    assert_eq!(logger.path().as_deref(), Some(good.as_path()));

    logger.write(Level::Info, "survivor");
    assert!(wait_for(|| {
        fs::read_to_string(&good).is_ok_and(|s| s.contains("survivor"))
    }));

    Ok(())
}

#[test]
fn set_path_to_the_current_file_is_a_noop() -> Result<(), LogError> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.log");

    let logger = Logger::to_file(Level::Debug, &path)?;
    logger.set_path(&path)?;
    logger.set_path(&path)?;
    assert_eq!(logger.path().as_deref(), Some(path.as_path()));

    Ok(())
}

#[test]
fn set_sink_replaces_the_file_target() -> Result<(), LogError> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.log");

    let logger = Logger::to_file(Level::Debug, &path)?;
    logger.write(Level::Info, "to file");
    assert!(wait_for(|| {
        fs::read_to_string(&path).is_ok_and(|s| s.contains("to file"))
    }));

    let sink = MemorySink::default();
    logger.set_sink(Box::new(sink.clone()));
    assert_eq!(logger.path(), None);

    logger.write(Level::Info, "to memory");
    assert!(wait_for(|| sink.lines().len() == 1));
    assert!(!fs::read_to_string(&path).unwrap().contains("to memory"));

    Ok(())
}

// Blocks each append until the gate is fed, simulating a slow sink.
struct GateSink {
    lines: Arc<Mutex<Vec<String>>>,
    gate: mpsc::Receiver<()>,
}

impl RecordSink for GateSink {
    fn append(&mut self, line: &str) -> io::Result<()> {
        self.gate
            .recv()
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "gate closed"))?;
        self.lines.lock().push(line.to_owned());
        Ok(())
    }
}

#[test]
fn full_record_queue_applies_backpressure() -> Result<(), LogError> {
    let (gate_tx, gate_rx) = mpsc::channel();
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = GateSink {
        lines: Arc::clone(&lines),
        gate: gate_rx,
    };

    let logger = Arc::new(
        Logger::builder()
            .queue_capacity(1)
            .sink(Box::new(sink))
            .build()?,
    );

    // The writer picks this up and stalls inside the sink.
    logger.write(Level::Info, "one");
    thread::sleep(Duration::from_millis(100));

    // Fills the queue; the next write must block.
    logger.write(Level::Info, "two");

    let unblocked = Arc::new(AtomicBool::new(false));
    let producer = {
        let logger = Arc::clone(&logger);
        let unblocked = Arc::clone(&unblocked);
        thread::spawn(move || {
            logger.write(Level::Info, "three");
            unblocked.store(true, Ordering::SeqCst);
        })
    };
    thread::sleep(Duration::from_millis(100));
    assert!(!unblocked.load(Ordering::SeqCst));

    // Letting one append through frees a queue slot.
    gate_tx.send(()).unwrap();
    producer.join().unwrap();
    assert!(unblocked.load(Ordering::SeqCst));

    gate_tx.send(()).unwrap();
    gate_tx.send(()).unwrap();
    assert!(wait_for(|| lines.lock().len() == 3));
    assert!(lines.lock()[2].ends_with("three"));

    logger.stop();
    Ok(())
}
