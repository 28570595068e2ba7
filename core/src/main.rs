mod services;

use common::{
    env_config::Config,
    error::{AppError, Res},
};
use log::{error, info};
use services::Services;

const USAGE: &str = "usage: probe <command>

commands:
  profile <user_id>                    billing profile summary
  feature <user_id> <feature> [value]  whether the feature can be consumed
  plans <region>                       plans on sale in a region
  recurrent <user_id>                  saved recurrent payment session";

#[tokio::main]
async fn main() {
    // get env vars
    let config = Config::from_env();

    // init logger
    if config.console_logging_enabled {
        logger::setup(
            config.log_file.as_deref(),
            logger::level_from_str(&config.log_level),
        )
        .expect("Failed to set up logger");
    }

    info!("Starting probe in {} environment", config.environment);
    let services = Services::from_config(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        ["profile", user_id] => profile(&services, user_id).await,
        ["feature", user_id, name] => feature(&services, user_id, name, "1").await,
        ["feature", user_id, name, value] => feature(&services, user_id, name, value).await,
        ["plans", region] => plans(&services, region).await,
        ["recurrent", user_id] => recurrent(&services, user_id).await,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    if let Err(e) = outcome {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn parse_id(value: &str, name: &str) -> Res<i64> {
    value
        .parse()
        .map_err(|_| AppError::InvalidArgument(format!("{} must be an integer", name)))
}

async fn profile(services: &Services, user_id: &str) -> Res<()> {
    let profile = services
        .billing
        .get_profile_by_user_id(parse_id(user_id, "user_id")?)
        .await?;

    println!("profile:   #{}", profile.profile_id());
    println!("region:    {}", profile.profile_region().unwrap_or("-"));
    println!("balance:   {}", profile.balance().unwrap_or("-"));

    if !profile.has_subscription() {
        println!("plan:      none");
        return Ok(());
    }

    let subscription = profile.subscription();
    println!(
        "plan:      {} ({}){}{}",
        profile.billing_plan().unwrap_or("-"),
        profile.billing_period().unwrap_or("-"),
        if profile.is_on_trial() { ", trial" } else { "" },
        if profile.is_on_grace() { ", grace" } else { "" },
    );
    println!("ends at:   {}", subscription.ends_at().unwrap_or("-"));

    for (name, quota) in &subscription.data().features {
        if quota.unlimited {
            println!("  {:<24} unlimited", name);
        } else {
            println!("  {:<24} {} of {} left", name, quota.left, quota.limit);
        }
    }

    Ok(())
}

async fn feature(services: &Services, user_id: &str, feature: &str, value: &str) -> Res<()> {
    let value = parse_id(value, "value")?;
    let profile = services
        .billing
        .get_profile_by_user_id(parse_id(user_id, "user_id")?)
        .await?;
    let subscription = profile.subscription();

    if !subscription.has_feature(feature) {
        println!("{} is not part of the current plan", feature);
    }

    println!(
        "within limits: {}",
        subscription.can_use_feature(feature, false, value)
    );
    println!(
        "with balance:  {} (balance {}, excess price {})",
        subscription.can_use_feature(feature, true, value),
        profile.raw_balance(),
        subscription.plan().feature_excess_price(feature)
    );

    Ok(())
}

async fn plans(services: &Services, region: &str) -> Res<()> {
    for plan in services.billing.plans(region).await? {
        println!("#{} {}", plan.id, plan.name.as_deref().unwrap_or("-"));
        for (period, price) in &plan.prices {
            let price = price
                .as_ref()
                .and_then(|p| p.formatted.clone())
                .unwrap_or_else(|| "not sold".to_string());
            println!("  {:<10} {}", period, price);
        }
    }

    Ok(())
}

async fn recurrent(services: &Services, user_id: &str) -> Res<()> {
    let user_id = parse_id(user_id, "user_id")?;

    match services.payments.recurrent_session_for(user_id).await? {
        Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
        None => println!("user #{} has no recurrent session", user_id),
    }

    Ok(())
}
