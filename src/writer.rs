use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::info;

use crate::{PitwallError, strategy::Stint};

/// Writes stints to `file`, one JSON object per line.
pub fn write_stints(file: &Path, stints: &[Stint]) -> Result<(), PitwallError> {
    let stint_file = File::create(file).map_err(|e| PitwallError::WriterError { source: e })?;
    let mut stint_file_writer = BufWriter::new(stint_file);
    for stint in stints {
        let line = serde_json::to_string(stint)
            .map_err(|e| PitwallError::StintSerializeError { source: e })?;
        writeln!(stint_file_writer, "{}", line)
            .map_err(|e| PitwallError::WriterError { source: e })?;
    }
    stint_file_writer
        .flush()
        .map_err(|e| PitwallError::WriterError { source: e })?;
    info!("Wrote {} stints to {:?}", stints.len(), file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Compound;
    use crate::strategy::segment;

    #[test]
    fn test_write_stints_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("stints.jsonl");
        let stints = segment([(1, Compound::Soft), (2, Compound::Soft), (3, Compound::Wet)]);

        write_stints(&output, &stints).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"compound":"SOFT","start_lap":1,"end_lap":2,"length":2}"#
        );

        let read_back = serde_jsonlines::json_lines(&output)
            .unwrap()
            .collect::<Result<Vec<Stint>, std::io::Error>>()
            .unwrap();
        assert_eq!(read_back, stints);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nope").join("stints.jsonl");
        assert!(matches!(
            write_stints(&output, &[]),
            Err(PitwallError::WriterError { .. })
        ));
    }
}
