#[macro_export]
macro_rules! reader_from_bytes {
    ($b : expr) => {{
        let buffer: &[u8] = $b.as_bytes();
        std::io::BufReader::new(buffer)
    }};
}

#[macro_export]
macro_rules! assert_json_error {
    ($outcome : expr, $location : expr, $reason : expr) => {{
        let err = $outcome.unwrap_err();
        assert_eq!(err.location().to_string(), $location);
        assert_eq!(err.reason(), $reason);
    }};
}
