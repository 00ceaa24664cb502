use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use binoffice_doc::{Cp, Document, Prl, PropertyCascade};
use serde::Serialize;

#[derive(Debug)]
struct Args {
    path: PathBuf,
    cp: Option<Cp>,
    json: bool,
}

impl Args {
    fn parse() -> Result<Self, io::Error> {
        let mut path: Option<PathBuf> = None;
        let mut cp: Option<Cp> = None;
        let mut json = false;

        let mut it = env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--json" => json = true,
                "--cp" => {
                    let value = it.next().ok_or_else(|| {
                        io::Error::new(io::ErrorKind::InvalidInput, "--cp expects <n>")
                    })?;
                    cp = Some(parse_cp(&value)?);
                }
                _ if arg.starts_with("--cp=") => {
                    cp = Some(parse_cp(&arg["--cp=".len()..])?);
                }
                _ if arg.starts_with('-') => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("unknown option: {arg}"),
                    ));
                }
                _ => {
                    if path.is_some() {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("unexpected argument: {arg}"),
                        ));
                    }
                    path = Some(PathBuf::from(arg));
                }
            }
        }

        let path =
            path.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "missing <path>"))?;
        Ok(Self { path, cp, json })
    }
}

fn parse_cp(value: &str) -> Result<Cp, io::Error> {
    value.parse().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid --cp value: {value}"),
        )
    })
}

fn print_usage() {
    println!(
        "\
doc-inspect: dump the structure of a Word 97-2003 .doc file

Usage:
  doc-inspect <path.doc> [--cp <n>] [--json]

Options:
  --cp <n>    Also show direct, style and merged properties at character position <n>
  --json      Emit a single JSON report instead of text
"
    );
}

#[derive(Debug, Serialize)]
struct Report {
    n_fib: u16,
    table_stream: &'static str,
    complex: bool,
    doc_len: Option<Cp>,
    pieces: Vec<PieceLine>,
    paragraphs: Vec<ParagraphLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    at: Option<PositionLine>,
}

#[derive(Debug, Serialize)]
struct PieceLine {
    cp_start: Cp,
    cp_end: Cp,
    byte_start: usize,
    compressed: bool,
    prm: String,
}

#[derive(Debug, Serialize)]
struct ParagraphLine {
    start: Cp,
    end: Cp,
    style: String,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct PositionLine {
    cp: Cp,
    paragraph: Option<(Cp, Cp)>,
    paragraph_properties: Option<CascadeLines>,
    character_properties: Option<CascadeLines>,
}

#[derive(Debug, Serialize)]
struct CascadeLines {
    defaults: Vec<String>,
    style: Vec<String>,
    direct: Vec<String>,
    merged: Vec<String>,
}

impl CascadeLines {
    fn new(cascade: &PropertyCascade) -> Self {
        Self {
            defaults: describe_all(&cascade.defaults),
            style: describe_all(&cascade.style),
            direct: describe_all(&cascade.direct),
            merged: describe_all(&cascade.merged()),
        }
    }
}

fn describe_all(prls: &[Prl]) -> Vec<String> {
    prls.iter().map(describe_prl).collect()
}

fn describe_prl(prl: &Prl) -> String {
    let hex: String = prl.operand.iter().map(|b| format!("{b:02X}")).collect();
    match prl.sprm.name() {
        Some(name) => format!("{name} ({:#06X}) {hex}", prl.sprm.raw()),
        None => format!("{:#06X} {hex}", prl.sprm.raw()),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("doc-inspect: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse()?;
    let doc = Document::open(&args.path)?;
    let report = build_report(&doc, args.cp);

    let mut stdout = io::BufWriter::new(io::stdout());
    if args.json {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
        writeln!(&mut stdout)?;
    } else {
        write_text(&mut stdout, &report)?;
    }
    stdout.flush()?;
    Ok(())
}

fn build_report(doc: &Document, cp: Option<Cp>) -> Report {
    let fib = doc.fib();
    let pieces = doc
        .piece_table()
        .map(|table| {
            table
                .pieces()
                .iter()
                .map(|piece| PieceLine {
                    cp_start: piece.cp_start,
                    cp_end: piece.cp_end,
                    byte_start: piece.byte_start,
                    compressed: piece.compressed,
                    prm: format!("{:?}", piece.prm),
                })
                .collect()
        })
        .unwrap_or_default();

    let style_name = |istd: u16| {
        doc.stylesheet()
            .and_then(|styles| styles.style(istd))
            .map(|style| style.name.clone())
            .unwrap_or_else(|| format!("istd {istd}"))
    };
    let paragraphs = doc
        .paragraphs()
        .map(|para| ParagraphLine {
            start: para.start,
            end: para.end,
            style: style_name(para.istd),
            text: para.text(doc),
        })
        .collect();

    let at = cp.map(|cp| PositionLine {
        cp,
        paragraph: doc.paragraph_bounds(cp),
        paragraph_properties: doc.paragraph_cascade(cp).as_ref().map(CascadeLines::new),
        character_properties: doc.character_cascade(cp).as_ref().map(CascadeLines::new),
    });

    Report {
        n_fib: fib.n_fib,
        table_stream: fib.table_stream_name(),
        complex: fib.flags().is_complex(),
        doc_len: doc.len(),
        pieces,
        paragraphs,
        at,
    }
}

fn write_text(out: &mut impl Write, report: &Report) -> io::Result<()> {
    writeln!(
        out,
        "nFib {:#06x}, table stream {}, complex: {}",
        report.n_fib, report.table_stream, report.complex
    )?;
    match report.doc_len {
        Some(len) => writeln!(out, "{len} characters in {} pieces", report.pieces.len())?,
        None => writeln!(out, "piece table unavailable")?,
    }
    for piece in &report.pieces {
        writeln!(
            out,
            "  cp {}..{} @ {:#x} {} {}",
            piece.cp_start,
            piece.cp_end,
            piece.byte_start,
            if piece.compressed { "cp1252" } else { "utf-16" },
            piece.prm
        )?;
    }

    writeln!(out, "{} paragraphs", report.paragraphs.len())?;
    for para in &report.paragraphs {
        let text = para.text.as_deref().unwrap_or("").trim_end_matches('\r');
        writeln!(
            out,
            "  [{}..={}] ({}) {:?}",
            para.start, para.end, para.style, text
        )?;
    }

    if let Some(at) = &report.at {
        writeln!(out, "cp {}: paragraph {:?}", at.cp, at.paragraph)?;
        for (label, cascade) in [
            ("paragraph", &at.paragraph_properties),
            ("character", &at.character_properties),
        ] {
            let Some(cascade) = cascade else {
                writeln!(out, "  {label} properties unavailable")?;
                continue;
            };
            for (layer, lines) in [
                ("defaults", &cascade.defaults),
                ("style", &cascade.style),
                ("direct", &cascade.direct),
                ("merged", &cascade.merged),
            ] {
                writeln!(out, "  {label} {layer}:")?;
                for line in lines {
                    writeln!(out, "    {line}")?;
                }
            }
        }
    }
    Ok(())
}
