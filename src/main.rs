use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use satstack::prelude::*;
use satstack::sweep;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "satstack")]
#[command(about = "A Rust-based accumulation-strategy backtesting engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    //run a single backtest
    Run {
        //path to csv data file
        #[arg(long, required_unless_present = "config")]
        data: Option<PathBuf>,

        //policy type (fixed, dip, ma)
        #[arg(long, required_unless_present = "config")]
        policy: Option<String>,

        //fraction below the running extreme that triggers a buy (for dip policy)
        #[arg(long)]
        dip: Option<f64>,

        //trailing window in days (for ma policy)
        #[arg(long)]
        window: Option<usize>,

        //cash accrued per day
        #[arg(long, default_value = "1.0")]
        daily_budget: f64,

        //path to a json configuration file, replaces the flags above
        #[arg(long)]
        config: Option<PathBuf>,

        //output path for allocation events csv
        #[arg(long)]
        output_events_csv: Option<PathBuf>,

        //output path for daily valuations csv
        #[arg(long)]
        output_valuations_csv: Option<PathBuf>,
    },

    //compare one policy across a parameter grid
    Compare {
        //path to csv data file
        #[arg(long)]
        data: PathBuf,

        //policy type to sweep (fixed, dip, ma)
        #[arg(long)]
        policy: String,

        //cash accrued per day for dip and ma sweeps
        #[arg(long, default_value = "1.0")]
        daily_budget: f64,

        //dip fractions to compare
        #[arg(long, value_delimiter = ',', default_values_t = vec![0.10, 0.15, 0.20, 0.25, 0.30, 0.40, 0.50])]
        dips: Vec<f64>,

        //daily amounts to compare for the fixed policy
        #[arg(long, value_delimiter = ',', default_values_t = vec![1.0, 5.0, 10.0, 25.0, 50.0])]
        budgets: Vec<f64>,

        //moving-average windows to compare
        #[arg(long, value_delimiter = ',', default_values_t = vec![10, 20, 50])]
        windows: Vec<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data,
            policy,
            dip,
            window,
            daily_budget,
            config,
            output_events_csv,
            output_valuations_csv,
        } => {
            let configuration = match config {
                Some(path) => BacktestConfiguration::from_json_file(&path)
                    .context(format!("Failed to load configuration from {:?}", path))?,
                None => {
                    //both flags are enforced by clap when no config file is given
                    let data =
                        data.ok_or_else(|| anyhow::anyhow!("--data required without --config"))?;
                    let policy_name = policy
                        .ok_or_else(|| anyhow::anyhow!("--policy required without --config"))?;

                    let policy_type = PolicyType::parse(&policy_name)
                        .ok_or_else(|| anyhow::anyhow!("Unknown policy: {}", policy_name))?;

                    let policy = match policy_type {
                        PolicyType::FixedAmount => PolicyParams::Fixed,
                        PolicyType::DipBelowExtreme => PolicyParams::Dip(DipParams {
                            dip_fraction: dip.unwrap_or(DipParams::default().dip_fraction),
                        }),
                        PolicyType::BelowMovingAverage => {
                            PolicyParams::MovingAverage(MovingAverageParams {
                                window: window.unwrap_or(MovingAverageParams::default().window),
                            })
                        }
                    };

                    BacktestConfiguration {
                        data_path: data,
                        daily_budget,
                        policy,
                        output_events_csv,
                        output_valuations_csv,
                    }
                }
            };

            run_backtest(&configuration)?;
        }
        Commands::Compare {
            data,
            policy,
            daily_budget,
            dips,
            budgets,
            windows,
        } => {
            run_comparison(data, &policy, daily_budget, &dips, &budgets, &windows)?;
        }
    }

    Ok(())
}

fn run_backtest(config: &BacktestConfiguration) -> Result<()> {
    println!("Satstack Accumulation Backtesting Engine");
    println!("========================================\n");

    //load data
    println!("Loading data from {:?}...", config.data_path);
    let bars = load_csv(&config.data_path)
        .context(format!("Failed to load data from {:?}", config.data_path))?;

    if bars.is_empty() {
        anyhow::bail!("No bars found in {:?}", config.data_path);
    }

    println!("Loaded {} days of price data", bars.len());
    println!(
        "Date range: {} to {}\n",
        bars.first().unwrap().date.date_naive(),
        bars.last().unwrap().date.date_naive()
    );

    //create policy
    let policy = config.policy.build();
    println!("Policy: {}", policy.name());
    println!("Daily budget: ${:.2}\n", config.daily_budget);

    //run simulation
    println!("Running backtest...\n");
    let engine_config = SimulationConfig {
        daily_budget: config.daily_budget,
    };
    let mut engine = SimulationEngine::new(engine_config, &bars);
    let result = engine.run(policy.as_ref())?;

    //display results
    println!("Backtest Results");
    println!("================\n");
    result.summary.pretty_print_table();

    if let Some(best) = &result.summary.best_purchase {
        println!(
            "\nBest Purchase: {:.8} units at ${:.2} on {}",
            best.units,
            best.price,
            best.date.date_naive()
        );
    }

    if let Some(worst) = &result.summary.worst_purchase {
        println!(
            "Worst Purchase: {:.8} units at ${:.2} on {}",
            worst.units,
            worst.price,
            worst.date.date_naive()
        );
    }

    //buy-and-hold comparison over the same period
    let buy_hold_pct = buy_and_hold_return_pct(&bars);
    println!("\nBuy and Hold Return: {:.2}%", buy_hold_pct);

    let invested = result.summary.total_invested;
    if invested > 0.0 {
        let first_close = bars.first().unwrap().close;
        let last_close = bars.last().unwrap().close;
        let equivalent_buy_hold = invested / first_close * last_close;

        println!(
            "Buy & Hold with same total investment: ${:.2}",
            equivalent_buy_hold
        );
        println!(
            "Policy vs Buy & Hold: {:+.2}",
            result.summary.final_value - equivalent_buy_hold
        );
    }

    //save outputs if requested
    if let Some(events_path) = &config.output_events_csv {
        save_events_csv(&result.events, events_path)?;
        println!("\nAllocation events saved to {:?}", events_path);
    }

    if let Some(valuations_path) = &config.output_valuations_csv {
        save_valuations_csv(&result.valuations, valuations_path)?;
        println!("Daily valuations saved to {:?}", valuations_path);
    }

    Ok(())
}

fn run_comparison(
    data: PathBuf,
    policy: &str,
    daily_budget: f64,
    dips: &[f64],
    budgets: &[f64],
    windows: &[usize],
) -> Result<()> {
    let policy_type = PolicyType::parse(policy)
        .ok_or_else(|| anyhow::anyhow!("Unknown policy: {}", policy))?;

    println!("Loading data from {:?}...", data);
    let bars = load_csv(&data).context(format!("Failed to load data from {:?}", data))?;

    if bars.is_empty() {
        anyhow::bail!("No bars found in {:?}", data);
    }

    println!("Loaded {} days of price data", bars.len());
    println!(
        "Date range: {} to {}\n",
        bars.first().unwrap().date.date_naive(),
        bars.last().unwrap().date.date_naive()
    );

    let specs = match policy_type {
        PolicyType::FixedAmount => sweep::daily_budget_grid(budgets),
        PolicyType::DipBelowExtreme => sweep::dip_fraction_grid(dips, daily_budget),
        PolicyType::BelowMovingAverage => sweep::ma_window_grid(windows, daily_budget),
    };

    println!(
        "Comparing {} combinations across {} days...\n",
        specs.len(),
        bars.len()
    );

    let results = sweep::run_sweep(&bars, &specs);
    sweep::print_table(&results);

    println!("\nBuy and Hold Return: {:.2}%", buy_and_hold_return_pct(&bars));

    Ok(())
}

fn save_events_csv(events: &[AllocationEvent], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(
        file,
        "date,price,amount,units,total_holding,total_invested,purchase_number,context"
    )?;

    for event in events {
        writeln!(
            file,
            "{},{},{},{},{},{},{},{}",
            event.date.to_rfc3339(),
            event.price,
            event.amount,
            event.units,
            event.total_holding,
            event.total_invested,
            event.purchase_number,
            describe_context(&event.context)
        )?;
    }

    Ok(())
}

fn save_valuations_csv(valuations: &[ValuationSnapshot], path: &PathBuf) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::File::create(path)?;
    writeln!(
        file,
        "date,price,accumulated_cash,portfolio_value,total_invested,unrealized_return"
    )?;

    for snapshot in valuations {
        writeln!(
            file,
            "{},{},{},{},{},{}",
            snapshot.date.to_rfc3339(),
            snapshot.price,
            snapshot.accumulated_cash,
            snapshot.portfolio_value,
            snapshot.total_invested,
            snapshot.unrealized_return
        )?;
    }

    Ok(())
}

fn describe_context(context: &DirectiveContext) -> String {
    match context {
        DirectiveContext::FixedSchedule => "fixed schedule".to_string(),
        DirectiveContext::DipFromExtreme { extreme, dip_pct } => {
            format!("{:.1}% below extreme of {:.2}", dip_pct, extreme)
        }
        DirectiveContext::BelowAverage { average } => {
            format!("below moving average of {:.2}", average)
        }
    }
}
