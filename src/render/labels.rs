//! Fixed label tables for the two supported locales

use crate::domain::{FilterMode, Locale, SortMode};

/// Every piece of static text shown on screen
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub last_update: &'static str,
    pub never: &'static str,
    pub failures: &'static str,
    pub sort: &'static str,
    pub filter: &'static str,
    pub hint: &'static str,
    pub loading: &'static str,
    pub empty: &'static str,
    pub log_heading: &'static str,
    pub trade: &'static str,
    /// Column headers in table order
    pub headers: [&'static str; 9],
    sort_modes: [&'static str; 4],
    filter_modes: [&'static str; 3],
}

const ZH: Labels = Labels {
    title: "four.meme 新币雷达",
    last_update: "最近更新：",
    never: "无",
    failures: "获取失败：",
    sort: "排序： ",
    filter: "筛选： ",
    hint: "← → 切换排序，↑ ↓ 切换筛选，回车确认，q 退出",
    loading: "加载中...",
    empty: "未找到代币",
    log_heading: "新币日志（最新在前，共 {total} 条）：",
    trade: "交易：",
    headers: ["名称", "符号", "价格", "市值", "成交额", "进度", "涨幅", "创建时间", "状态"],
    sort_modes: ["热门", "最新", "订单数", "募资进度"],
    filter_modes: ["全部", "中文", "币安链(BSC)"],
};

const EN: Labels = Labels {
    title: "four.meme New Token Radar",
    last_update: "Last update: ",
    never: "never",
    failures: "Fetch failures: ",
    sort: "Sort: ",
    filter: "Filter: ",
    hint: "← → sort, ↑ ↓ filter, Enter to apply, q to quit",
    loading: "Loading...",
    empty: "No tokens found",
    log_heading: "New token log (newest first, total {total}):",
    trade: "Trade: ",
    headers: ["Name", "Symbol", "Price", "MCap", "Volume", "Progress", "Change", "Created", "Status"],
    sort_modes: ["Hot", "Newest", "Orders", "Progress"],
    filter_modes: ["All", "Chinese", "BNB Chain (BSC)"],
};

impl Labels {
    pub fn for_locale(locale: Locale) -> &'static Labels {
        match locale {
            Locale::Zh => &ZH,
            Locale::En => &EN,
        }
    }

    pub fn sort_mode(&self, mode: SortMode) -> &'static str {
        match mode {
            SortMode::Hot => self.sort_modes[0],
            SortMode::TimeDesc => self.sort_modes[1],
            SortMode::OrderDesc => self.sort_modes[2],
            SortMode::ProgressDesc => self.sort_modes[3],
        }
    }

    pub fn filter_mode(&self, mode: FilterMode) -> &'static str {
        match mode {
            FilterMode::All => self.filter_modes[0],
            FilterMode::Chinese => self.filter_modes[1],
            FilterMode::Bsc => self.filter_modes[2],
        }
    }

    /// Event log heading with the total filled in
    pub fn log_heading(&self, total: usize) -> String {
        self.log_heading.replace("{total}", &total.to_string())
    }
}
