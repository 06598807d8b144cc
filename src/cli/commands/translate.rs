use std::collections::HashMap;

use clap::Args;
use serde_json::json;

use crate::cli::utils::{output_value, parse_key_value};
use crate::cli::OutputFormat;
use crate::i18n::{Locale, Translator};

#[derive(Args)]
pub struct TranslateArgs {
    #[arg(help = "Locale code (pt, en, es); unknown codes use pt")]
    pub locale: String,

    #[arg(help = "Dotted key path, e.g. dashboard.title")]
    pub key: String,

    #[arg(long = "param", short = 'p', help = "Placeholder value as name=value (repeatable)")]
    pub params: Vec<String>,
}

pub fn handle(args: TranslateArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let translator = Translator::default();
    let locale = args.locale.parse::<Locale>().unwrap_or_else(|_| translator.default_locale());

    let params = args
        .params
        .iter()
        .map(|p| parse_key_value(p))
        .collect::<anyhow::Result<HashMap<_, _>>>()?;

    let value = translator.translate_with(locale, &args.key, &params);

    output_value(
        output_format,
        &json!({ "locale": locale.code(), "key": args.key, "value": value }),
        |_| println!("{}", value),
    )
}
