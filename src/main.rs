//! Membership Discounts - command line entry point.
//!
//! Loads configuration, wires the Stripe and PostgreSQL adapters, and runs
//! one coupon maintenance command.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use membership_discounts::adapters::{
    PostgresDiscountCouponRepository, RetryingCouponProvider, StripeCouponAdapter,
};
use membership_discounts::application::{CouponLifecycle, DiscountResolver};
use membership_discounts::config::AppConfig;
use membership_discounts::domain::foundation::DiscountCouponId;
use membership_discounts::domain::pricing::{CouponLookup, DiscountCoupon, PriceLevel};
use membership_discounts::ports::{CouponProvider, DiscountCouponRepository};

#[derive(Parser, Debug)]
#[command(name = "membership-discounts")]
#[command(about = "Synchronizes membership price-level discounts with Stripe coupons")]
#[command(version)]
struct Cli {
    /// Force debug coupon IDs (overrides config)
    #[arg(long, env = "MEMBERSHIP_DISCOUNTS__SERVER__DEBUG")]
    debug: Option<bool>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure every discount record has its Stripe coupon (default)
    Sync,

    /// Print the discount resolved for each price level
    Discounts,

    /// Recreate a record's coupon from its current percentage
    Replace {
        /// Discount record ID
        #[arg(long)]
        id: i64,
    },

    /// Delete a record's coupon and clear the link
    Delete {
        /// Discount record ID
        #[arg(long)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if cli.debug.is_some() {
        config.server.debug = cli.debug;
    }
    config.validate().context("Invalid configuration")?;

    init_tracing(&config);

    let environment = config.server.coupon_environment();
    info!(
        environment = %environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "Membership discounts starting"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;
        info!("Database migrations applied");
    }

    let stripe = Arc::new(StripeCouponAdapter::new(config.payment.stripe_config()));
    let provider: Arc<dyn CouponProvider> = Arc::new(RetryingCouponProvider::new(
        stripe,
        config.payment.retry_policy(),
    ));
    let repository: Arc<dyn DiscountCouponRepository> =
        Arc::new(PostgresDiscountCouponRepository::new(pool));

    let lifecycle = CouponLifecycle::new(provider.clone(), repository.clone(), environment);

    match cli.command.unwrap_or(Command::Sync) {
        Command::Sync => {
            let report = lifecycle.sync_all().await?;
            for coupon in &report.synced {
                info!(coupon_id = %coupon.id, percent_off = ?coupon.percent_off, "Coupon in sync");
            }
            if !report.is_complete() {
                anyhow::bail!("{} discount coupon(s) failed to sync", report.failed.len());
            }
        }
        Command::Discounts => {
            let resolver = DiscountResolver::new(provider);
            for level in PriceLevel::ALL {
                match resolver.get_discount_fraction_off(level).await {
                    Ok(discount) => info!(
                        price_level = %level,
                        coupon_id = discount.coupon_id().unwrap_or("-"),
                        fraction_off = %discount.fraction_off,
                        "Discount for price level"
                    ),
                    Err(e) => error!(price_level = %level, error = %e, "No usable discount"),
                }
            }
        }
        Command::Replace { id } => {
            let mut record = find_record(repository.as_ref(), id).await?;
            let current = match lifecycle.get_stripe_coupon(&record).await? {
                CouponLookup::Found(coupon) => coupon,
                CouponLookup::NotFound { coupon_id } => {
                    anyhow::bail!("Stripe coupon {} does not exist; run sync first", coupon_id)
                }
            };
            let replacement = lifecycle.replace_stripe_coupon(&mut record, &current).await?;
            info!(coupon_id = %replacement.id, "Coupon replaced");
        }
        Command::Delete { id } => {
            let mut record = find_record(repository.as_ref(), id).await?;
            let deleted = lifecycle.delete_stripe_coupon(&mut record).await?;
            info!(coupon_id = %deleted.id, "Coupon deleted");
        }
    }

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn find_record(
    repository: &dyn DiscountCouponRepository,
    id: i64,
) -> anyhow::Result<DiscountCoupon> {
    repository
        .find_by_id(DiscountCouponId::new(id))
        .await?
        .with_context(|| format!("Discount coupon {} not found", id))
}
