use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pharma_compare_common::{
    count_by_product_type_for, search_sections, CompanyType, CoverageMatrix, Document, DocumentStats,
    SearchOptions,
};
use pharma_compare_rust::cli::{Cli, Commands};
use pharma_compare_rust::config::Config;
use pharma_compare_rust::loader::{CacheFile, DocumentLoader};
use pharma_compare_rust::logging::init_logging;
use pharma_compare_rust::{export, prices};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());
    let use_cache = config.use_cache && !cli.no_cache;
    debug!("データフォルダ: {} (キャッシュ: {})", data_dir.display(), use_cache);

    match cli.command {
        Commands::Products => {
            let loader = build_loader(&data_dir, &config, false)?;
            let catalog = loader.available_products();

            println!("=== 利用可能な製品一覧 ===");
            if catalog.is_empty() {
                println!("製品カテゴリが見つかりません: {}", data_dir.display());
            }
            for group in &catalog {
                println!("\n【{}】", group.product_type);
                for company in CompanyType::ALL {
                    let products = group.products(company);
                    println!("  {}: {}製品", company, products.len());
                    for name in products {
                        println!("    - {}", name);
                    }
                }
            }
        }

        Commands::Load { json } => {
            let loader = build_loader(&data_dir, &config, use_cache)?;
            let documents = load_with_progress(&loader);
            let stats = DocumentStats::from_documents(&documents);

            println!("=== 読み込み完了 ===");
            println!("総文書数: {}", stats.total_docs);
            print_counts("製品カテゴリ別", &stats.by_product_type);
            print_counts("会社区分別", &stats.by_company);
            print_counts("文書タイプ別", &stats.by_type);

            if let Some(path) = json {
                let content = serde_json::to_string_pretty(&documents)?;
                std::fs::write(&path, content)
                    .with_context(|| format!("JSONの保存に失敗: {}", path.display()))?;
                println!("\n✔ 文書をJSONに保存: {}", path.display());
            }
        }

        Commands::Stats { doc_type } => {
            let loader = build_loader(&data_dir, &config, use_cache)?;
            let documents = load_with_progress(&loader);
            let stats = DocumentStats::from_documents(&documents);

            println!("総文書数: {}", stats.total_docs);
            print_counts("製品カテゴリ別", &stats.by_product_type);
            print_counts("会社区分別", &stats.by_company);
            print_counts("文書タイプ別", &stats.by_type);
            print_counts("製品別", &stats.by_product);

            let breakdown = count_by_product_type_for(&documents, doc_type);
            println!("\n【{}】", doc_type);
            println!("  総数: {}文書", breakdown.values().sum::<usize>());
            for (product_type, count) in &breakdown {
                println!("  {}: {}文書", product_type, count);
            }
        }

        Commands::Prices { category, find } => {
            let price_tables = prices::load_drug_prices(&data_dir)?;
            if price_tables.is_empty() {
                println!("薬価データがありません");
            }

            for (name, table) in &price_tables {
                if category.as_deref().is_some_and(|c| c != name) {
                    continue;
                }

                println!("\n【{}】 {} ({}行)", name, table.source_file, table.len());
                let columns: Vec<&str> = table.headers.iter().take(5).map(String::as_str).collect();
                println!("  列: {:?}{}", columns, if table.column_count() > 5 { "..." } else { "" });

                if let Some(keyword) = &find {
                    let rows = table.find_rows(keyword);
                    println!("  「{}」: {}件", keyword, rows.len());
                    for row in rows {
                        println!("    {}", row.join(" | "));
                    }
                }
            }
        }

        Commands::Search { query, product_type, company, doc_type, limit, json } => {
            let loader = build_loader(&data_dir, &config, use_cache)?;
            let documents = load_with_progress(&loader);

            let options = SearchOptions {
                product_type,
                company_type: company,
                doc_type,
                limit: Some(limit),
            };
            let hits = search_sections(&documents, &query, &options);

            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                println!("🔍 「{}」: {}件", query, hits.len());
                for hit in &hits {
                    let company = hit.company_type.map(|c| c.dir_name()).unwrap_or("-");
                    let page = hit.page.map(|p| format!(" p.{}", p)).unwrap_or_default();
                    println!(
                        "\n[{}] {} ({}) {} {}{}",
                        hit.score, hit.product_name, company, hit.doc_type, hit.file_name, page
                    );
                    if let Some(heading) = &hit.heading {
                        println!("    {}", heading);
                    }
                    println!("    …{}…", hit.snippet);
                }
            }
        }

        Commands::Compare { product_type, gaps } => {
            let loader = build_loader(&data_dir, &config, use_cache)?;
            let documents = load_with_progress(&loader);
            let matrix = CoverageMatrix::build(&documents, &product_type);

            if matrix.is_empty() {
                bail!("{}の文書が見つかりません", product_type);
            }

            println!("【{}】", product_type);
            print!("{}", matrix.render());

            if gaps {
                let missing = matrix.missing();
                println!("\n不足している文書: {}件", missing.len());
                for gap in missing {
                    println!("  {} ({}): {}", gap.product_name, gap.company_type, gap.doc_type);
                }
            }
        }

        Commands::Export { output, format, title } => {
            let loader = build_loader(&data_dir, &config, use_cache)?;
            let documents = load_with_progress(&loader);
            let price_tables = prices::load_drug_prices(&data_dir)?;

            let written = export::export_results(&documents, &price_tables, &format, &output, &title)?;
            for path in written {
                println!("✔ 出力: {}", path.display());
            }
        }

        Commands::Cache { clear, info } => {
            let cache_path = CacheFile::cache_path(&data_dir);

            if info || !clear {
                if cache_path.exists() {
                    let cache = CacheFile::load(&data_dir);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match CacheFile::clear(&data_dir) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }

        Commands::Config { set_api_key, set_data_dir, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(dir) = set_data_dir {
                config.set_data_dir(dir)?;
                println!("✔ データフォルダを設定しました: {}", config.data_dir.display());
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  データフォルダ: {}", config.data_dir.display());
                println!("  製品カテゴリ: {}", config.product_types.join(", "));
                println!("  キャッシュ: {}", if config.use_cache { "有効" } else { "無効" });
                println!("  OpenAI APIキー: {}", if config.has_api_key() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn build_loader(data_dir: &Path, config: &Config, use_cache: bool) -> Result<DocumentLoader> {
    let loader = DocumentLoader::new(data_dir).with_product_types(config.product_types.clone());
    loader.ensure_data_dir()?;
    Ok(loader.with_cache(use_cache))
}

/// カテゴリ×会社区分単位で進捗を表示しながら全文書を読み込む
fn load_with_progress(loader: &DocumentLoader) -> Vec<Document> {
    let total = loader.existing_product_types().len() * CompanyType::ALL.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let documents = loader.load_all_documents_with(|product_type, company, count| {
        pb.set_message(format!("{} {}: {}文書", product_type, company, count));
        pb.inc(1);
    });
    pb.finish_and_clear();

    if let Err(e) = loader.save_cache() {
        warn!("キャッシュの保存に失敗: {}", e);
    }

    documents
}

fn print_counts(title: &str, counts: &BTreeMap<String, usize>) {
    println!("\n【{}】", title);
    for (label, count) in counts {
        println!("  {}: {}文書", label, count);
    }
}
