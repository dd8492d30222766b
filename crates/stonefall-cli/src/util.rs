use std::{
    fs::{self, File},
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use stonefall_engine::Board;
use stonefall_evaluator::heuristic::HeuristicWeights;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Reads heuristic weights from a JSON file and rejects non-finite values.
///
/// Fields missing from the file keep their default weights.
pub fn read_weights_file<P>(path: P) -> anyhow::Result<HeuristicWeights>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let weights: HeuristicWeights = read_json_file("weights", path)?;
    weights
        .validate()
        .with_context(|| format!("Invalid weights file: {}", path.display()))?;
    Ok(weights)
}

/// Reads an ASCII-art board file.
///
/// Rows are listed top to bottom and aligned to the bottom of the board.
pub fn read_board_file<P>(path: P) -> anyhow::Result<Board>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file: {}", path.display()))?;
    let board = text
        .parse()
        .with_context(|| format!("Failed to parse board file: {}", path.display()))?;
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("stonefall-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_weights_file() {
        let path = temp_file("weights.json", r#"{ "holes": -2.0 }"#);
        let weights = read_weights_file(&path).unwrap();
        assert_eq!(
            weights,
            HeuristicWeights {
                holes: -2.0,
                ..HeuristicWeights::default()
            }
        );
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_weights_file_rejects_unknown_field() {
        let path = temp_file("bad-weights.json", r#"{ "wells": 1.0 }"#);
        let err = read_weights_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse weights JSON file"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_weights_file_rejects_overflow() {
        let path = temp_file("huge-weights.json", r#"{ "holes": 1e300 }"#);
        let err = read_weights_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid weights file"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_board_file() {
        let path = temp_file("board.txt", "..........\nIIII......\n");
        let board = read_board_file(&path).unwrap();
        assert_eq!(board, Board::from_ascii("IIII......"));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_board_file("/nonexistent/stonefall/board.txt").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read board file"));
    }
}
