use std::fs;
use std::time::Duration;
use pirstream::core::config::{Config, DEFAULT_DIR_NAME, NB_FILE_DESCRIPTORS};
use pirstream::core::stats::StreamStats;
use pirstream::{CatalogMode, DatabaseHandler, StreamDatabase, StreamId};
use tempfile::TempDir;

fn open_database(stream_count: u64) -> (TempDir, StreamDatabase) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("0"), b"AB\n").unwrap();
    fs::write(dir.path().join("2"), b"").unwrap();

    let config = Config::new(dir.path(), stream_count)
        .with_handle_pool_size(4)
        .with_handle_wait_timeout(Duration::from_secs(1))
        .with_read_threads(2);
    let db = StreamDatabase::open(config).unwrap();
    (dir, db)
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.database_dir.to_str(), Some(DEFAULT_DIR_NAME));
    assert_eq!(config.handle_pool_size, NB_FILE_DESCRIPTORS);
    assert_eq!(config.handle_wait_timeout(), Duration::from_secs(5));
    assert!(config.read_threads >= 1);
}

#[test]
fn test_config_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("server.json");

    let config = Config::new("/srv/pir/db", 1000).with_handle_pool_size(8);
    config.to_json_file(&path).unwrap();
    assert_eq!(Config::from_json_file(&path).unwrap(), config);

    // Omitted fields fall back to defaults
    fs::write(&path, r#"{ "database_dir": "data/", "stream_count": 12 }"#).unwrap();
    let partial = Config::from_json_file(&path).unwrap();
    assert_eq!(partial.stream_count, 12);
    assert_eq!(partial.handle_pool_size, NB_FILE_DESCRIPTORS);

    fs::write(&path, "not json").unwrap();
    assert!(Config::from_json_file(&path).is_err());
}

#[test]
fn test_handler_serves_catalog_and_sizes() {
    let (_dir, db) = open_database(4);
    let handler: &dyn DatabaseHandler = &db;

    assert_eq!(handler.get_catalog(CatalogMode::Verbose), "0\n4\n0\n3\n1\n0\n2\n0\n3\n0\n");
    assert_eq!(handler.get_catalog(CatalogMode::from(false)), "1\n4\n3\n");
    assert_eq!(handler.stream_count(), 4);
    assert_eq!(handler.max_file_size(), 3);
    assert_eq!(handler.db_size_bits(), 3 * 2 * 8);
}

#[test]
fn test_handler_stream_round_trip() {
    let (_dir, db) = open_database(4);
    let handler: &dyn DatabaseHandler = &db;

    let mut buf = [0xAAu8; 6];
    let mut stream = handler.open_stream(StreamId(0), 0).unwrap();
    handler.read_stream(&mut stream, &mut buf);
    handler.close_stream(stream);
    assert_eq!(&buf, b"AB\n\0\0\0");

    let mut buf = [0xAAu8; 6];
    let mut stream = handler.open_stream(StreamId(3), 0).unwrap();
    handler.read_stream(&mut stream, &mut buf);
    handler.close_stream(stream);
    assert_eq!(buf, [0u8; 6]);

    let mut out = [0xAAu8; 6];
    handler.read_aggregated_stream(0, 2, 0, 3, &mut out).unwrap();
    assert_eq!(&out, b"AB\n\0\0\0");
}

#[test]
fn test_missing_directory_serves_fake_catalog() {
    let dir = TempDir::new().unwrap();
    let db = StreamDatabase::open(Config::new(dir.path().join("absent"), 2)).unwrap();

    assert_eq!(db.get_catalog(CatalogMode::Compact), "1\n2\n0\n");
    assert_eq!(db.read_stream_at(StreamId(1), 0, 4).unwrap(), vec![0u8; 4]);
}

#[test]
fn test_stats() {
    let (dir, db) = open_database(4);
    fs::write(dir.path().join("unused"), b"x").unwrap();

    db.read_stream_at(StreamId(0), 0, 10).unwrap();
    db.read_groups(&[0, 1], 2, 0, 3).unwrap();

    let stats = db.stats();
    assert_eq!(
        stats,
        StreamStats {
            stream_count: 4,
            real_stream_count: 2,
            anomaly_count: 0,
            max_file_size: 3,
            db_size_bits: 48,
            handle_pool_capacity: 4,
            handle_pool_available: 4,
            stream_reads: 5,
            aggregated_reads: 2,
            bytes_served: 22,
        }
    );

    let json = stats.to_json().unwrap();
    assert!(json.contains("\"stream_count\":4"));
}

#[test]
fn test_open_rejects_empty_handle_pool() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("0"), b"AB\n").unwrap();

    let config = Config::new(dir.path(), 2)
        .with_handle_pool_size(0)
        .with_handle_wait_timeout(Duration::from_millis(200));
    let err = StreamDatabase::open(config).err().unwrap();
    assert_eq!(err.kind(), pirstream::ErrorKind::InvalidArgument);
}

#[test]
fn test_huge_wait_timeout_saturates() {
    let config = Config::default().with_handle_wait_timeout(Duration::MAX);
    assert_eq!(config.handle_wait_timeout_ms, u64::MAX);

    let config = Config::default().with_handle_wait_timeout(Duration::from_millis(1500));
    assert_eq!(config.handle_wait_timeout_ms, 1500);
}
