#![windows_subsystem = "windows"]

use collatz_longest::*;
use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use std::sync::{Arc, Mutex};
use std::thread;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 560.0])
            .with_title("Collatz Longest Trajectory"),
        ..Default::default()
    };
    eframe::run_native(
        "collatz-longest",
        options,
        Box::new(|cc| {
            setup_japanese_font(&cc.egui_ctx);
            Ok(Box::new(CollatzApp::default()))
        }),
    )
}

fn setup_japanese_font(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    let font_paths = [
        "C:\\Windows\\Fonts\\YuGothR.ttc",
        "C:\\Windows\\Fonts\\meiryo.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/System/Library/Fonts/Hiragino Sans GB.ttc",
    ];
    for path in &font_paths {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("japanese".to_owned(), egui::FontData::from_owned(data));
            fonts.families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .insert(0, "japanese".to_owned());
            break;
        }
    }
    ctx.set_fonts(fonts);
}

// ─── データ構造 ─────────────────────────────────────

struct RunState {
    running: bool,
    stop_requested: bool,
    /// 結果欄に表示する行
    log: Vec<String>,
    /// 完了時の最長軌道（プロット用）
    best_trajectory: Option<Trajectory>,
}

struct CollatzApp {
    engine: Arc<SearchEngine>,
    limit_input: String,
    workers: usize,
    max_workers: usize,
    state: Arc<Mutex<RunState>>,
}

impl Default for CollatzApp {
    fn default() -> Self {
        let hw = thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            engine: Arc::new(SearchEngine::new()),
            limit_input: "1000000".to_string(),
            workers: hw,
            max_workers: hw,
            state: Arc::new(Mutex::new(RunState {
                running: false,
                stop_requested: false,
                log: Vec::new(),
                best_trajectory: None,
            })),
        }
    }
}

impl eframe::App for CollatzApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let running = self.state.lock().unwrap().running;
        if running {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Collatz 最長軌道");
                ui.separator();
                ui.label("上限 N:");
                ui.add_enabled(
                    !running,
                    egui::TextEdit::singleline(&mut self.limit_input).desired_width(160.0),
                );
                let limit_valid = self.limit_input.trim().parse::<u64>().map(|v| v >= 1).unwrap_or(false);
                if !limit_valid {
                    ui.colored_label(egui::Color32::from_rgb(220, 50, 50), "1 以上の整数");
                }
            });
            ui.horizontal(|ui| {
                ui.label("スレッド:");
                ui.add_enabled(!running, egui::Slider::new(&mut self.workers, 1..=self.max_workers));
                ui.label(format!("(最大 {})", self.max_workers));
                ui.separator();
                if ui.add_enabled(!running, egui::Button::new("開始")).clicked() {
                    self.start();
                }
                let stop_enabled = running && !self.state.lock().unwrap().stop_requested;
                if ui.add_enabled(stop_enabled, egui::Button::new("停止")).clicked() {
                    self.stop();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let state = self.state.lock().unwrap();
            for line in &state.log {
                ui.label(line);
            }
            if let Some(ref t) = state.best_trajectory {
                ui.separator();
                ui.label(format!("n={} の軌道 (長さ {}, 最大値 {})", t.start().unwrap_or(0), t.len(), t.peak));
                let points: PlotPoints = t
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v as f64])
                    .collect();
                Plot::new("trajectory_plot")
                    .height(ui.available_height())
                    .show(ui, |plot_ui| plot_ui.line(Line::new(points)));
            }
        });
    }
}

impl CollatzApp {
    fn start(&mut self) {
        let limit = match self.limit_input.trim().parse::<u64>() {
            Ok(n) if n >= 1 => n,
            _ => return,
        };
        let workers = self.workers;
        {
            let mut s = self.state.lock().unwrap();
            s.running = true;
            s.stop_requested = false;
            s.log.clear();
            s.best_trajectory = None;
        }
        // 停止要求のリセットは UI スレッドで済ませ、直後の停止を取りこぼさない
        self.engine.reset_stop();
        let engine = Arc::clone(&self.engine);
        let state = Arc::clone(&self.state);

        thread::spawn(move || {
            // パニック時も running = false を保証するガード
            struct RunGuard(Arc<Mutex<RunState>>);
            impl Drop for RunGuard {
                fn drop(&mut self) {
                    if let Ok(mut s) = self.0.lock() {
                        s.running = false;
                    }
                }
            }
            let _guard = RunGuard(Arc::clone(&state));

            let result = engine.run(limit, workers);
            let best_trajectory = result
                .as_ref()
                .ok()
                .and_then(AggregateReport::best_start)
                .and_then(|n| trajectory(n).ok());

            let mut s = state.lock().unwrap();
            match result {
                Ok(report) => s.log.extend(report.summary_message().lines().map(str::to_owned)),
                Err(e) => s.log.push(format!("エラー: {}", e)),
            }
            s.best_trajectory = best_trajectory;
            s.running = false;
        });
    }

    fn stop(&mut self) {
        self.engine.request_stop();
        let mut s = self.state.lock().unwrap();
        s.stop_requested = true;
        s.log.push("Stop requested...".to_string());
    }
}
