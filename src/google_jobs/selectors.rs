/// 求人パネルのCSSセレクタ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// スクロール対象の求人リスト
    pub panel: String,
    /// 左側の求人タブ
    pub listing_tab: String,
    /// 求人詳細
    pub listing_detail: String,
    pub title: String,
    pub employer: String,
    pub description: String,
    pub highlight_group: String,
    pub highlight_line: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            panel: "div[role='tree']".to_string(),
            listing_tab: "div[class='gws-plugins-horizon-jobs__tl-lif']".to_string(),
            // 同一idが複数並ぶため属性セレクタで全件取得する
            listing_detail: "div[id='gws-plugins-horizon-jobs__job_details_page']".to_string(),
            title: "h2[class='KLsYvd']".to_string(),
            employer: "div[class*='nJlQNd']".to_string(),
            description: "span[class='HBvzbc']".to_string(),
            highlight_group: "div[class='JxVj3d']".to_string(),
            highlight_line: "div[class='IiQJ2c']".to_string(),
        }
    }
}
