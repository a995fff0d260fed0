//! Departures Demo: A split-flap airport departure board.
//!
//! Simulates a feed of departure rows flipping into place, with a staggered
//! reveal, periodic timetable updates, and hover previews on mouse-over.
//!
//! Press 'q' or Escape to quit.

use crossbeam_channel::select;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use flapboard::{
    Board, BoardConfig, BoardSnapshot, BoardView, OutputBuffer, Rgb, RowSpec, Surface, Ticker,
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const ORIGIN_X: u16 = 2;
const ORIGIN_Y: u16 = 1;
const AMBER: Rgb = Rgb::from_u32(0xD4A017);

fn placeholder_rows() -> Vec<RowSpec> {
    let mut rows: Vec<RowSpec> = (0..6).map(|_| RowSpec::new("").with_length(30)).collect();
    rows[2] = RowSpec::new(" LOADING...").with_length(30);
    rows
}

fn timetable(departed: bool) -> Vec<RowSpec> {
    let first = if departed {
        "10:42  AMSTERDAM    KL1001  GATE B4"
    } else {
        "10:42  AMSTERDAM    KL1001  BOARDING"
    };
    vec![
        RowSpec::new("DEPARTURES").with_length(38).with_accent(AMBER),
        RowSpec::new("").with_length(38).without_hinge(),
        RowSpec::new(first).with_length(38),
        RowSpec::new("11:05  REYKJAVIK    FI0205  ON TIME").with_length(38),
        RowSpec::new("11:30  MILAN MXP    AZ0573  DELAYED").with_length(38),
        RowSpec::new("12:15  NEW YORK     DL0047  ON TIME").with_length(38),
    ]
}

/// Map a terminal position to the (row, col) of the cell under it, using
/// the same layout the view draws with.
fn hit_test(snapshot: &BoardSnapshot, x: u16, y: u16) -> Option<(usize, usize)> {
    let mut top = ORIGIN_Y;
    for (row_idx, row) in snapshot.rows.iter().enumerate() {
        let height = if row.hinge { 3 } else { 2 };
        let cell_width = row
            .cells
            .iter()
            .map(|c| c.current.chars().count().max(c.previous.chars().count()))
            .max()
            .unwrap_or(1)
            .max(1) as u16;
        if y >= top && y < top + height && x >= ORIGIN_X {
            let stride = cell_width + 1;
            let offset = x - ORIGIN_X;
            if offset % stride < cell_width {
                let col = usize::from(offset / stride);
                if col < row.cells.len() {
                    return Some((row_idx, col));
                }
            }
            return None;
        }
        top += height + 1;
    }
    None
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let start = Instant::now();
    let mut board = Board::new(placeholder_rows(), BoardConfig::default(), start)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

    let result = run(&mut board, &mut stdout);

    execute!(stdout, cursor::Show, DisableMouseCapture, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    result
}

fn run(board: &mut Board, stdout: &mut io::Stdout) -> io::Result<()> {
    let ticker = Ticker::spawn(Duration::from_millis(20));
    let view = BoardView::new().with_origin(ORIGIN_X, ORIGIN_Y);
    let (width, height) = terminal::size()?;
    let mut surface = Surface::new(width, height);
    let mut out = OutputBuffer::with_capacity(16 * 1024);

    // Simulated feed: the real timetable lands shortly after startup, then
    // one row's status changes every few seconds.
    let start = Instant::now();
    let mut feed_delivered = false;
    let mut departed = false;
    let mut next_swap = start + Duration::from_secs(8);
    let mut hovered: Option<(usize, usize)> = None;

    out.clear_screen();
    out.flush_to(stdout)?;

    loop {
        select! {
            recv(ticker.receiver()) -> tick => {
                let Ok(tick) = tick else { break };
                let now = tick.at;

                if !feed_delivered && now >= start + Duration::from_millis(1500) {
                    feed_delivered = true;
                    board
                        .update(timetable(departed), now)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
                    board.feed_ready(now);
                }
                if feed_delivered && now >= next_swap {
                    departed = !departed;
                    next_swap = now + Duration::from_secs(8);
                    board
                        .update(timetable(departed), now)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
                }

                board.advance(now);
                surface.clear();
                view.render(&board.snapshot(), &mut surface);
                out.clear();
                out.draw_surface(0, 0, &surface);
                out.flush_to(stdout)?;
            }
        }

        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        ticker.join();
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Moved) => {
                    let now = Instant::now();
                    let hit = hit_test(&board.snapshot(), mouse.column, mouse.row);
                    if hit != hovered {
                        if let Some((row, col)) = hovered {
                            board.hover_out(row, col, now);
                        }
                        if let Some((row, col)) = hit {
                            board.hover_in(row, col);
                        }
                        hovered = hit;
                    }
                }
                Event::Resize(w, h) => {
                    surface.resize(w, h);
                    out.clear();
                    out.clear_screen();
                    out.flush_to(stdout)?;
                }
                _ => {}
            }
        }
    }

    ticker.join();
    Ok(())
}
