use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::telemetry;
use crate::telemetry::ops::queries::Phase;

/// Built-in topical search phrases (Russian-language automotive channels).
pub const SEARCH_QUERIES: &[&str] = &[
    // general
    "авто",
    "автомобиль",
    "автомобили",
    "машины",
    "автоканал",
    "авто канал",
    "автоблог",
    "авто блог",
    "автомобильный блог",
    "автошоу",
    "авто шоу",

    // reviews and test drives
    "обзор авто",
    "обзоры авто",
    "обзор автомобиля",
    "обзоры автомобилей",
    "автообзор",
    "авто обзоры",
    "тест драйв",
    "тест-драйв",
    "тест драйв авто",
    "тест-драйв автомобиля",
    "тест-драйв новых автомобилей",
    "новые авто обзор",
    "обзор новых автомобилей",
    "обзор подержанных авто",
    "обзор б/у авто",
    "обзор бюджетных авто",
    "обзор китайских авто",
    "китайские авто обзор",
    "китайские автомобили обзор",
    "обзор корейских авто",
    "обзор немецких авто",
    "обзор японских авто",
    "обзор электромобилей",

    // buying, selling, inspection
    "автоподбор",
    "подбор авто",
    "подбор автомобиля",
    "подбор б/у авто",
    "автоподбор россия",
    "автоподбор москва",
    "автоподбор спб",
    "автоподбор питер",
    "автоподбор екатеринбург",
    "автоподбор новосибирск",
    "автоподбор казахстан",
    "автоподбор алматы",
    "авто рынок",
    "рынок б/у авто",
    "авто из японии",
    "авто из кореи",
    "авто из китая",
    "авто из европы",

    // repair, service, DIY
    "ремонт авто",
    "ремонт автомобиля",
    "ремонт машины",
    "автосервис",
    "автосервис канал",
    "гараж ремонт авто",
    "ремонт авто своими руками",
    "машина своими руками",
    "авто своими руками",
    "авто лайфхаки",
    "диагностика авто",
    "авто диагностика",
    "автоэлектрика",
    "авто электрика",
    "кузовной ремонт",
    "покраска авто",
    "покраска автомобиля",
    "рихтовка авто",
    "переборка двигателя",
    "ремонт двигателя авто",
    "ремонт подвески",
    "ремонт коробки передач",
    "автослесарь",

    // tuning, styling, motorsport
    "тюнинг авто",
    "авто тюнинг",
    "тюнинг автомобилей",
    "стайлинг авто",
    "автозвук",
    "авто звук",
    "чип тюнинг",
    "дрифт",
    "drift авто",
    "дрифт машины",
    "drag racing",
    "гонки авто",
    "street racing",
    "stance авто",
    "стенс авто",
    "offroad 4x4",
    "внедорожник оффроуд",
    "джип трофи",
    "ралли авто",
    "автоспорт",

    // makes and models
    "обзор ваз",
    "обзор lada",
    "обзор лада",
    "обзор гранта",
    "обзор лада веста",
    "обзор уаз",
    "обзор bmw",
    "обзор mercedes",
    "обзор mercedes-benz",
    "обзор audi",
    "обзор volkswagen",
    "обзор vw",
    "обзор skoda",
    "обзор toyota",
    "обзор nissan",
    "обзор honda",
    "обзор mazda",
    "обзор kia",
    "обзор hyundai",
    "обзор renault",
    "обзор peugeot",
    "обзор citroen",
    "обзор porsche",
    "обзор tesla",

    // regional
    "авто москва",
    "авто спб",
    "авто питер",
    "авто ростов",
    "авто краснодар",
    "авто екатеринбург",
    "авто новосибирск",
    "авто казахстан",
    "авто алматы",
    "авто астана",
    "авто минск",
    "авто киев",
    "авто одесса",

    // lifestyle
    "жизнь с авто",
    "авто путешествия",
    "дальняк на машине",
    "жизнь в тачке",
    "авто будни",
    "такси на личном авто",
    "жизнь таксиста",
    "грузовики блог",
    "грузовой авто блог",
];

/// channel-scout queries
#[derive(Args, Debug)]
pub struct QueriesCmd {
    /// Only print queries containing this substring
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Serialize)]
struct QueryList<'a> {
    total: usize,
    queries: Vec<&'a str>,
}

/// Pick the queries a run should issue: explicit ones win over the built-in list,
/// and `max` caps the count.
pub fn select(explicit: &[String], max: Option<usize>) -> Vec<String> {
    let base: Vec<String> = if explicit.is_empty() {
        SEARCH_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        explicit.iter().map(|q| q.trim().to_string()).filter(|q| !q.is_empty()).collect()
    };
    match max {
        Some(n) => base.into_iter().take(n).collect(),
        None => base,
    }
}

pub fn run(args: QueriesCmd) -> Result<()> {
    let log = telemetry::queries();
    let _g = log.root_span_kv([("filter", format!("{:?}", args.filter))]).entered();

    let queries: Vec<&str> = {
        let _s = log.span(&Phase::List).entered();
        SEARCH_QUERIES
            .iter()
            .copied()
            .filter(|q| args.filter.as_deref().map_or(true, |f| q.contains(f)))
            .collect()
    };

    if telemetry::config::json_mode() {
        log.result(&QueryList { total: queries.len(), queries })?;
    } else {
        for q in &queries { println!("{}", q); }
        log.info(format!("📋 {} queries", queries.len()));
    }
    Ok(())
}
