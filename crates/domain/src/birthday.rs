//! # 誕生日ウィンドウ
//!
//! 「今日から 7 日後まで（両端含む）」に誕生日を迎える連絡先を
//! 年を無視した月日だけで判定する。
//!
//! ## 月日キー
//!
//! 月日は `month * 100 + day`（例: 12 月 29 日 → `1229`）の整数キーで比較する。
//! ウィンドウが年末をまたぐ場合（開始キー > 終了キー）は、
//! 「開始キー以上 **または** 終了キー以下」を範囲とみなす。
//!
//! ```text
//! 通常:        start ──────── end            key ∈ [start, end]
//! 年末またぎ:  ── end   ...   start ──       key ≥ start ∨ key ≤ end
//! ```
//!
//! リポジトリの SQL も同じキーと同じ述語で絞り込むため、
//! インメモリ判定（[`BirthdayWindow::contains`]）と DB 判定は一致する。
//!
//! 2 月 29 日生まれはキー `229` のまま扱う。平年は 2/28 → 3/1 をまたぐ
//! ウィンドウで対象になる。

use chrono::{Datelike, Days, NaiveDate};

/// ウィンドウの長さ（今日からの日数、終端を含む）
pub const BIRTHDAY_LOOKAHEAD_DAYS: u64 = 7;

/// 月日キーを計算する
pub fn month_day_key(date: NaiveDate) -> i32 {
    (date.month() * 100 + date.day()) as i32
}

/// 誕生日ウィンドウ（値オブジェクト）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    start: NaiveDate,
    end:   NaiveDate,
}

impl BirthdayWindow {
    /// `today` から [`BIRTHDAY_LOOKAHEAD_DAYS`] 日後までのウィンドウを作る
    pub fn starting(today: NaiveDate) -> Self {
        let end = today
            .checked_add_days(Days::new(BIRTHDAY_LOOKAHEAD_DAYS))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 開始日の月日キー
    pub fn start_key(&self) -> i32 {
        month_day_key(self.start)
    }

    /// 終了日の月日キー
    pub fn end_key(&self) -> i32 {
        month_day_key(self.end)
    }

    /// 年末をまたぐか
    pub fn wraps_year(&self) -> bool {
        self.start_key() > self.end_key()
    }

    /// 誕生日（年は無視）がウィンドウ内か
    pub fn contains(&self, birthday: NaiveDate) -> bool {
        let key = month_day_key(birthday);
        if self.wraps_year() {
            key >= self.start_key() || key <= self.end_key()
        } else {
            self.start_key() <= key && key <= self.end_key()
        }
    }
}
