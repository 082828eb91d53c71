//! Command Line Interface for the wBLT router.
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wblt_domain::amount::Amount;
use wblt_domain::pool::{Hop, Route};
use wblt_domain::ports::{Clock, TokenPort, VaultPort};
use wblt_domain::rounding::Rounding;
use wblt_domain::token::{Address, Token};
use wblt_execution::config::RouterConfig;
use wblt_execution::context::CallContext;
use wblt_execution::router::Router;
use wblt_simulation::chain::{DEFAULT_DECIMALS, SimChain};
use wblt_simulation::fixture::Fixture;
use wblt_simulation::snapshot::{self, ChainSnapshot};

#[derive(Parser)]
#[command(name = "wblt")]
#[command(about = "wBLT router quoting and dry-run CLI", long_about = None)]
struct Cli {
    /// Chain snapshot (JSON). Falls back to WBLT_SNAPSHOT, then to the
    /// built-in demo market.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List known tokens
    Tokens,
    /// List pools and option tokens
    Pools,
    /// Quote a multi-hop swap
    QuoteSwap {
        /// Comma-separated symbols or addresses, e.g. WETH,wBLT,BMX
        #[arg(long, value_delimiter = ',')]
        path: Vec<String>,

        /// Input amount in token units
        #[arg(long)]
        amount: Decimal,

        /// Use stable pools for every pool hop
        #[arg(long)]
        stable: bool,
    },
    /// wBLT minted for an asset amount
    MintQuote {
        #[arg(long)]
        asset: String,

        #[arg(long)]
        amount: Decimal,
    },
    /// Asset received for redeeming wBLT
    RedeemQuote {
        #[arg(long)]
        asset: String,

        /// wBLT shares in token units
        #[arg(long)]
        shares: Decimal,

        /// Round the share valuation up instead of down
        #[arg(long)]
        round_up: bool,
    },
    /// Quote adding liquidity to a wBLT pool with an underlying asset
    QuoteAdd {
        #[arg(long)]
        underlying: String,

        /// The pool's other token
        #[arg(long)]
        token: String,

        #[arg(long)]
        stable: bool,

        #[arg(long)]
        underlying_amount: Decimal,

        #[arg(long)]
        token_amount: Decimal,
    },
    /// Quote removing liquidity from a wBLT pool into an underlying asset
    QuoteRemove {
        #[arg(long)]
        underlying: String,

        #[arg(long)]
        token: String,

        #[arg(long)]
        stable: bool,

        /// LP amount in 18-decimal units
        #[arg(long)]
        liquidity: Decimal,
    },
    /// Quote the underlying needed to exercise options into LP
    QuoteExercise {
        #[arg(long)]
        option: String,

        #[arg(long)]
        underlying: String,

        #[arg(long)]
        amount: Decimal,

        /// Discount in basis points
        #[arg(long)]
        discount: u16,
    },
    /// Execute a swap against a copy of the chain and report the result
    Swap {
        #[arg(long, value_delimiter = ',')]
        path: Vec<String>,

        #[arg(long)]
        amount: Decimal,

        #[arg(long)]
        stable: bool,

        /// Minimum output in token units
        #[arg(long, default_value = "0")]
        min_out: Decimal,

        /// Paying account; defaults to the demo market's first user
        #[arg(long)]
        from: Option<String>,
    },
}

/// Snapshot file: router configuration plus chain state.
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    router: RouterConfig,
    chain: ChainSnapshot,
}

struct Market {
    router: Router,
    chain: SimChain,
    default_caller: Option<Address>,
}

impl Market {
    fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = path.or_else(|| env::var("WBLT_SNAPSHOT").ok().map(PathBuf::from));
        match path {
            Some(path) => {
                let file: SnapshotFile = snapshot::read_json(&path)
                    .with_context(|| format!("loading snapshot {}", path.display()))?;
                Ok(Self {
                    router: Router::new(file.router),
                    chain: file.chain.build()?,
                    default_caller: None,
                })
            }
            None => {
                let Fixture { chain, book } = Fixture::new()?;
                info!("using demo market");
                Ok(Self {
                    router: Router::new(RouterConfig::new(book.router, book.weth)),
                    chain,
                    default_caller: Some(book.alice),
                })
            }
        }
    }

    fn token_at(&self, address: Address) -> Token {
        self.chain
            .token(address)
            .cloned()
            .unwrap_or_else(|| Token::new(address, format!("{address:?}"), DEFAULT_DECIMALS))
    }

    fn wblt(&self) -> Token {
        self.token_at(self.chain.vault_token())
    }

    fn token(&self, name: &str) -> Result<Token> {
        if let Some(hex) = name.strip_prefix("0x") {
            let address: Address = hex
                .parse()
                .map_err(|e| anyhow!("invalid address {name}: {e:?}"))?;
            return Ok(self.token_at(address));
        }
        self.chain
            .token_by_symbol(name)
            .cloned()
            .ok_or_else(|| anyhow!("unknown token {name}"))
    }

    fn account(&self, from: Option<&str>) -> Result<Address> {
        match (from, self.default_caller) {
            (Some(name), _) => {
                let hex = name.strip_prefix("0x").unwrap_or(name);
                hex.parse()
                    .map_err(|e| anyhow!("invalid account {name}: {e:?}"))
            }
            (None, Some(caller)) => Ok(caller),
            (None, None) => bail!("--from is required with a snapshot"),
        }
    }

    fn route(&self, path: &[String], stable: bool) -> Result<(Route, Vec<Token>)> {
        let tokens = path
            .iter()
            .map(|name| self.token(name))
            .collect::<Result<Vec<_>>>()?;
        let hops = tokens
            .windows(2)
            .map(|pair| Hop::new(pair[0].address, pair[1].address, stable))
            .collect();
        Ok((Route::new(hops)?, tokens))
    }
}

fn raw(amount: Decimal, token: &Token) -> Result<U256> {
    Ok(Amount::from_decimal(amount, token.decimals)?.raw)
}

fn show(raw: U256, token: &Token) -> String {
    format!("{} {}", Amount::new(raw, token.decimals), token.symbol)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let market = Market::load(cli.snapshot)?;
    let router = market.router;
    let chain = &market.chain;

    match &cli.command {
        Commands::Tokens => {
            println!("{:<8} | {:<42} | {:>8}", "Symbol", "Address", "Decimals");
            println!("{}", "-".repeat(64));
            for token in chain.tokens() {
                println!(
                    "{:<8} | {:<42} | {:>8}",
                    token.symbol,
                    format!("{:?}", token.address),
                    token.decimals
                );
            }
        }
        Commands::Pools => {
            println!("💧 Pools");
            for pool in chain.pools() {
                let token0 = market.token_at(pool.token0);
                let token1 = market.token_at(pool.token1);
                println!(
                    "   {}/{} {} ({} bps) | {} + {}",
                    token0.symbol,
                    token1.symbol,
                    pool.curve,
                    pool.fee_bps,
                    show(pool.reserve0, &token0),
                    show(pool.reserve1, &token1)
                );
            }
            println!("🎟️  Options");
            for option in chain.options() {
                let token = market.token_at(option.info.token);
                let underlying = market.token_at(option.info.underlying_token);
                println!(
                    "   {} -> {} (max discount {} bps)",
                    token.symbol, underlying.symbol, option.info.max_lp_discount
                );
            }
        }
        Commands::QuoteSwap {
            path,
            amount,
            stable,
        } => {
            let (route, tokens) = market.route(path, *stable)?;
            let amount_in = raw(*amount, &tokens[0])?;
            let amounts = router.get_amounts_out(chain, amount_in, &route)?;

            println!("🔍 Quote for {} hop(s)", route.len());
            for (token, amount) in tokens.iter().zip(&amounts) {
                println!("   {}", show(*amount, token));
            }
        }
        Commands::MintQuote { asset, amount } => {
            let asset = market.token(asset)?;
            let wblt = market.wblt();
            let amount = raw(*amount, &asset)?;
            let shares = router.get_mint_amount_wrapped_blt(chain, asset.address, amount)?;
            println!("✅ {} mints {}", show(amount, &asset), show(shares, &wblt));
        }
        Commands::RedeemQuote {
            asset,
            shares,
            round_up,
        } => {
            let asset = market.token(asset)?;
            let wblt = market.wblt();
            let rounding = if *round_up { Rounding::Up } else { Rounding::Down };
            let shares = raw(*shares, &wblt)?;
            let out = router.get_redeem_amount_wrapped_blt(chain, asset.address, shares, rounding)?;
            println!("✅ {} redeems to {}", show(shares, &wblt), show(out, &asset));
        }
        Commands::QuoteAdd {
            underlying,
            token,
            stable,
            underlying_amount,
            token_amount,
        } => {
            let underlying = market.token(underlying)?;
            let token = market.token(token)?;
            let wblt = market.wblt();
            let quote = router.quote_add_liquidity_underlying(
                chain,
                underlying.address,
                token.address,
                *stable,
                raw(*underlying_amount, &underlying)?,
                raw(*token_amount, &token)?,
            )?;

            println!("📊 Add Liquidity Quote");
            println!("════════════════════════════════════");
            println!("Underlying:  {}", show(quote.underlying_amount, &underlying));
            println!("wBLT:        {}", show(quote.wblt_amount, &wblt));
            println!("Token:       {}", show(quote.token_amount, &token));
            println!("LP minted:   {}", Amount::new(quote.liquidity, DEFAULT_DECIMALS));
            println!("════════════════════════════════════");
        }
        Commands::QuoteRemove {
            underlying,
            token,
            stable,
            liquidity,
        } => {
            let underlying = market.token(underlying)?;
            let token = market.token(token)?;
            let lp = Amount::from_decimal(*liquidity, DEFAULT_DECIMALS)?.raw;
            let quote =
                router.quote_remove_liquidity_underlying(chain, underlying.address, token.address, *stable, lp)?;

            println!("📊 Remove Liquidity Quote");
            println!("════════════════════════════════════");
            println!("Underlying:  {}", show(quote.underlying_amount, &underlying));
            println!("Token:       {}", show(quote.token_amount, &token));
            println!("════════════════════════════════════");
        }
        Commands::QuoteExercise {
            option,
            underlying,
            amount,
            discount,
        } => {
            let option = market.token(option)?;
            let underlying = market.token(underlying)?;
            let wblt = market.wblt();
            let quote = router.quote_token_needed_to_exercise_lp(
                chain,
                option.address,
                underlying.address,
                raw(*amount, &option)?,
                *discount,
            )?;

            println!("📊 Exercise Quote ({} bps discount)", discount);
            println!("════════════════════════════════════");
            println!("Pay:         {}", show(quote.payment_token_amount, &underlying));
            println!("wBLT total:  {}", show(quote.partner_token_amount, &wblt));
            println!("  strike:    {}", show(quote.strike_shares, &wblt));
            println!("  pairing:   {}", show(quote.pairing_shares, &wblt));
            println!("════════════════════════════════════");
        }
        Commands::Swap {
            path,
            amount,
            stable,
            min_out,
            from,
        } => {
            let (route, tokens) = market.route(path, *stable)?;
            let caller = market.account(from.as_deref())?;
            let amount_in = raw(*amount, &tokens[0])?;
            let last = &tokens[tokens.len() - 1];
            let amount_out_min = raw(*min_out, last)?;

            let plan = router.plan_swap(chain, &route, amount_in, caller, caller)?;
            println!("🧭 Plan");
            for instruction in &plan.instructions {
                println!("   {instruction}");
            }

            let mut scratch = chain.clone();
            let ctx = CallContext::for_caller(caller, scratch.now());
            let before = scratch.balance_of(last.address, caller);
            let realized =
                router.swap_exact_tokens_for_tokens(&mut scratch, &ctx, &route, amount_in, amount_out_min)?;
            let after = scratch.balance_of(last.address, caller);

            println!("🚀 Dry run");
            for (token, amount) in tokens.iter().zip(&realized) {
                println!("   {}", show(*amount, token));
            }
            println!(
                "   balance {} -> {}",
                show(before, last),
                show(after, last)
            );
            println!("   (no state persisted)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/snapshot.json");

    #[test]
    fn test_demo_snapshot_loads() {
        let market = Market::load(Some(PathBuf::from(DEMO))).unwrap();
        assert!(market.default_caller.is_none());
        let router = market.router;
        let chain = market.chain;
        let weth = chain.token_by_symbol("WETH").unwrap().address;
        let usdc = chain.token_by_symbol("USDC").unwrap().address;
        let route = Route::new(vec![Hop::volatile(weth, usdc)]).unwrap();
        let amounts = router
            .get_amounts_out(&chain, U256::exp10(18), &route)
            .unwrap();
        assert!(!amounts[1].is_zero());
    }

    #[test]
    fn test_cli_parses_path() {
        let cli = Cli::try_parse_from([
            "wblt",
            "quote-swap",
            "--path",
            "WETH,wBLT,BMX",
            "--amount",
            "1.5",
        ])
        .unwrap();
        match cli.command {
            Commands::QuoteSwap { path, amount, .. } => {
                assert_eq!(path, vec!["WETH", "wBLT", "BMX"]);
                assert_eq!(amount, Decimal::new(15, 1));
            }
            _ => panic!("wrong command"),
        }
    }
}
