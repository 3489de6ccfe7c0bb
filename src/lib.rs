/*!
# QR Attendance

A browser-based attendance tool built in Rust: scan QR codes with a device
camera, keep each distinct payload once with the moment it was scanned, and
download the list as a spreadsheet.

## Architecture

### Frontend Layer
- **Technologies**: HTML, JavaScript (camera decoding happens in the browser)
- **Key Components**:
  - Scanner view - Starts/stops the camera and posts decoded text
  - Attendance table - Lists records in scan order
  - Banner - Shows the current notification until it expires

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Scan Session - Deduplicates decoded text and appends timestamped records
  - Notification Center - Single transient message slot with scheduled clears
  - Exporter - XLSX and CSV serialization of the record list

Nothing is persisted: the session lives as long as the process.

## Modules

- **record**: `ScanRecord` and the capture timestamp format
- **session**: Scan ingestion, deduplication and export hand-off
- **notification**: Transient notifications and their expiry timers
- **error**: Session error taxonomy
- **downloader**: Export functionality (CSV, XLSX)
- **config**: Command-line configuration
- **console**: Line dispatch for the terminal front end
- **app**: Routing and handlers (feature `web`)

## REST API Endpoints

- `GET /` - Scanner page
- `GET /api/state` - Records, scanning flag and banner
- `POST /api/scan/start`, `POST /api/scan/stop` - Toggle scanning
- `POST /api/scan` - Submit decoded text
- `POST /api/scan/error` - Report a decoder failure (logged only)
- `GET /api/notification` - Current banner
- `GET /api/export`, `GET /api/export.csv` - Download the records
- `POST /api/reset` - Drop all records
*/

pub mod config;
pub mod console;
pub mod downloader;
pub mod error;
pub mod notification;
pub mod record;
pub mod session;

#[cfg(feature = "web")]
pub mod app;

/// Re-export the everyday types to make them easier to use
pub use error::SessionError;
pub use notification::{ExpiryPolicy, Notification, NotificationCenter, Severity, TimerHandle};
pub use record::ScanRecord;
pub use session::{Outcome, ScanSession};
