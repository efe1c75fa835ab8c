// event-docs: Generate attendance lists and certificates for event registrations

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use event_docs::assemble::certificate_filename;
use event_docs::certificate::select_recipient;
use event_docs::logging::{self, LogConfig, LogFormat};
use event_docs::store::{JsonFileStore, RegistrationFilter, RegistrationStore};
use event_docs::{
    Assembler, CancelToken, DocError, DocumentInfo, DocumentRequest, ErrorKind, REPORT_FILENAME,
};
use tracing::warn;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate attendance lists and certificates for event registrations")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    log_format: LogFormatArg,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Event-wise attendance list of every paid registration
    Report {
        /// Registrations file (JSON array)
        #[arg(short, long)]
        data: PathBuf,

        /// Output filename (defaults to Event_Attendance_List.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Certificate for one team member
    Certificate {
        /// Registrations file (JSON array)
        #[arg(short, long)]
        data: PathBuf,

        /// Registration id
        #[arg(short, long)]
        registration: String,

        /// Team position within the registration (0-based)
        #[arg(long)]
        team: usize,

        /// Member position within the team (0-based)
        #[arg(long)]
        member: usize,

        /// Output filename (defaults to Certificate_<Name>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Paid registrations, newest first
    List {
        /// Registrations file (JSON array)
        #[arg(short, long)]
        data: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let args = Args::parse();

    let format = match args.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    logging::init(
        &LogConfig::from_verbosity(args.verbose)
            .with_format(format)
            .with_ansi(io::stderr().is_terminal()),
    );

    if let Err(e) = run(args.command) {
        eprintln!("Error: {}", e);
        let code = match e.kind() {
            ErrorKind::InputMissing => 2,
            ErrorKind::RenderingFault | ErrorKind::UpstreamFault => 1,
        };
        std::process::exit(code);
    }
}

fn run(command: Command) -> Result<(), DocError> {
    match command {
        Command::Report { data, output } => {
            let store = JsonFileStore::new(data);
            let registrations = store.find(&RegistrationFilter::successful())?;
            let output = output.unwrap_or_else(|| PathBuf::from(REPORT_FILENAME));

            let request = DocumentRequest::AttendanceReport {
                registrations: &registrations,
            };
            let info = write_document(&request, &output)?;

            println!("✓ Generated: {}", output.display());
            println!("  Registrations: {}", registrations.len());
            println!("  Pages: {}", info.pages);
        }
        Command::Certificate {
            data,
            registration,
            team,
            member,
            output,
        } => {
            let store = JsonFileStore::new(data);
            let reg = store
                .get(&registration)?
                .ok_or_else(|| DocError::NotFound(format!("registration {}", registration)))?;
            let (_, recipient) = select_recipient(&reg, team, member)?;
            let output = output.unwrap_or_else(|| PathBuf::from(certificate_filename(&recipient.name)));

            let request = DocumentRequest::Certificate {
                registration: &reg,
                team_index: team,
                member_index: member,
            };
            write_document(&request, &output)?;

            println!("✓ Generated: {}", output.display());
            println!("  Registration: {}", reg.id);
        }
        Command::List { data } => {
            let store = JsonFileStore::new(data);
            let registrations = store.find(&RegistrationFilter::successful().newest_first())?;
            if registrations.is_empty() {
                return Err(DocError::NoData("no paid registrations".to_string()));
            }
            for reg in &registrations {
                println!(
                    "{}  {}  {}  teams: {}  members: {}  total: {:.2}",
                    reg.created_at.format("%Y-%m-%d"),
                    reg.id,
                    reg.organization.name,
                    reg.teams.len(),
                    reg.member_count(),
                    reg.grand_total,
                );
            }
        }
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

/// Generate into `path`. The file only appears once the first byte is ready,
/// and is removed again if generation fails part way.
fn write_document(request: &DocumentRequest<'_>, path: &Path) -> Result<DocumentInfo, DocError> {
    let mut sink = DeferredFile::new(path);
    let result = Assembler::new().generate(request, &mut sink, &CancelToken::new());
    if result.is_err() && sink.created() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove partial output");
        }
    }
    result
}

struct DeferredFile<'a> {
    path: &'a Path,
    writer: Option<BufWriter<File>>,
}

impl<'a> DeferredFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, writer: None }
    }

    fn created(&self) -> bool {
        self.writer.is_some()
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            self.writer = Some(BufWriter::new(File::create(self.path)?));
        }
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other("output file not open"))
    }
}

impl Write for DeferredFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}
