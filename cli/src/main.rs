use {
    apricot_lending::{
        config::parse_pubkey,
        decode, explain,
        instruction::LendingInstruction,
        pda,
        state::AccountShape,
        PriceSource, ProtocolConfig,
    },
    base64::{engine::general_purpose::STANDARD, Engine as _},
    clap::{
        crate_description, crate_name, crate_version, value_t, App, AppSettings, Arg, ArgMatches,
        SubCommand,
    },
    log::{debug, info, warn},
    solana_program::pubkey::Pubkey,
    solana_sdk::signature::Signer,
    std::{
        error::Error,
        fs,
        io::{self, Read},
        process::exit,
    },
};

type CliResult<T> = Result<T, Box<dyn Error>>;

const ADDRESS_KINDS: &[&str] = &[
    "base-pda",
    "price-pda",
    "pool-list",
    "pool-summaries",
    "price-summaries",
    "user-pages-stats",
    "users-page",
    "asset-pool",
    "asset-pool-spl",
    "asset-price",
    "price",
    "user-info",
];

fn main() {
    env_logger::init();

    let shapes: Vec<&str> = AccountShape::ALL.iter().map(|shape| shape.name()).collect();
    let matches = App::new(crate_name!())
        .about(crate_description!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("program_id")
                .long("program-id")
                .value_name("PUBKEY")
                .takes_value(true)
                .global(true)
                .help("Lending program id [default: devnet deployment]"),
        )
        .arg(
            Arg::with_name("pyth")
                .long("pyth")
                .global(true)
                .help("Read prices from Pyth feeds where registered"),
        )
        .arg(
            Arg::with_name("pyth_feed")
                .long("pyth-feed")
                .value_name("POOL=PUBKEY")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .global(true)
                .help("Register the Pyth price feed of a pool, given by symbol, id or mint"),
        )
        .subcommand(
            SubCommand::with_name("address")
                .about("Derive a protocol account address")
                .arg(
                    Arg::with_name("kind")
                        .value_name("KIND")
                        .required(true)
                        .possible_values(ADDRESS_KINDS),
                )
                .arg(
                    Arg::with_name("pool")
                        .long("pool")
                        .value_name("SYMBOL|POOL_ID|MINT")
                        .takes_value(true)
                        .help("Pool of asset-pool, asset-pool-spl, asset-price and price"),
                )
                .arg(
                    Arg::with_name("page")
                        .long("page")
                        .value_name("PAGE_ID")
                        .takes_value(true)
                        .help("Page of users-page"),
                )
                .arg(
                    Arg::with_name("wallet")
                        .long("wallet")
                        .value_name("PUBKEY")
                        .takes_value(true)
                        .help("Wallet of user-info"),
                ),
        )
        .subcommand(SubCommand::with_name("pools").about("List the configured pools"))
        .subcommand(
            SubCommand::with_name("decode")
                .about("Decode account data")
                .arg(
                    Arg::with_name("shape")
                        .value_name("SHAPE")
                        .required(true)
                        .possible_values(&shapes),
                )
                .arg(
                    Arg::with_name("data")
                        .value_name("DATA")
                        .required_unless("file")
                        .help("Hex encoded account data, or - for raw bytes on stdin"),
                )
                .arg(
                    Arg::with_name("file")
                        .long("file")
                        .value_name("PATH")
                        .takes_value(true)
                        .conflicts_with("data")
                        .help("Read raw account data from a file"),
                )
                .arg(
                    Arg::with_name("base64")
                        .long("base64")
                        .help("DATA is base64 rather than hex"),
                ),
        )
        .subcommand(
            SubCommand::with_name("instruction")
                .about("Decode lending instruction data")
                .arg(
                    Arg::with_name("data")
                        .value_name("DATA")
                        .required(true)
                        .help("Hex encoded instruction data"),
                ),
        )
        .subcommand(
            SubCommand::with_name("explain")
                .about("Turn a transaction error message into a readable one")
                .arg(Arg::with_name("message").value_name("MESSAGE").required(true)),
        )
        .subcommand(
            SubCommand::with_name("market-vault")
                .about("Generate a serum market keypair with an off-curve vault signer")
                .arg(
                    Arg::with_name("max_attempts")
                        .long("max-attempts")
                        .value_name("N")
                        .takes_value(true)
                        .help("Give up after N keypairs"),
                ),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        exit(1);
    }
}

fn run(matches: &ArgMatches) -> CliResult<()> {
    let config = load_config(matches)?;
    debug!("using program {}", config.program_id);
    match matches.subcommand() {
        ("address", Some(arg_matches)) => command_address(&config, arg_matches),
        ("pools", Some(_)) => command_pools(&config),
        ("decode", Some(arg_matches)) => command_decode(arg_matches),
        ("instruction", Some(arg_matches)) => command_instruction(arg_matches),
        ("explain", Some(arg_matches)) => {
            println!("{}", explain(arg_matches.value_of("message").unwrap_or_default()));
            Ok(())
        }
        ("market-vault", Some(arg_matches)) => command_market_vault(&config, arg_matches),
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> CliResult<ProtocolConfig> {
    let mut config = ProtocolConfig::devnet();
    if let Some(program_id) = matches.value_of("program_id") {
        config = config.with_program_id(parse_pubkey(program_id)?);
    }
    if matches.is_present("pyth") {
        config = config.with_price_source(PriceSource::Pyth);
    }
    for feed in matches.values_of("pyth_feed").into_iter().flatten() {
        add_pyth_feed(&mut config, feed)?;
    }
    Ok(config)
}

/// Registers a `POOL=PUBKEY` Pyth feed.
fn add_pyth_feed(config: &mut ProtocolConfig, value: &str) -> CliResult<()> {
    let (pool, feed) = value
        .split_once('=')
        .ok_or_else(|| format!("expected POOL=PUBKEY, got {:?}", value))?;
    let (pool_id, _) = resolve_pool(config, pool)?;
    config.pools.set_pyth_price(pool_id, parse_pubkey(feed)?)?;
    debug!("pool {} priced by pyth feed {}", pool_id, feed);
    Ok(())
}

/// Accepts a pool symbol, a numeric pool id or a registered mint.
fn resolve_pool(config: &ProtocolConfig, value: &str) -> CliResult<(u8, Pubkey)> {
    let entry = match value.parse::<u8>() {
        Ok(pool_id) => config.pools.get_by_pool_id(pool_id),
        Err(_) => config.pools.get_by_symbol(value).or_else(|| {
            parse_pubkey(value)
                .ok()
                .and_then(|mint| config.pools.get(&mint))
        }),
    };
    entry
        .map(|entry| (entry.pool_id, entry.mint))
        .ok_or_else(|| format!("no pool matches {:?}", value).into())
}

fn command_address(config: &ProtocolConfig, matches: &ArgMatches) -> CliResult<()> {
    let kind = matches.value_of("kind").unwrap_or_default();
    let pool = || -> CliResult<(u8, Pubkey)> {
        let value = matches.value_of("pool").ok_or("--pool is required")?;
        resolve_pool(config, value)
    };
    let address = match kind {
        "base-pda" => pda::base_pda(&config.program_id).0,
        "price-pda" => pda::price_pda(&config.program_id).0,
        "pool-list" => pda::pool_list(config)?,
        "pool-summaries" => pda::pool_summaries(config)?,
        "price-summaries" => pda::price_summaries(config)?,
        "user-pages-stats" => pda::user_pages_stats(config)?,
        "users-page" => {
            let page_id = value_t!(matches, "page", u16).map_err(|e| e.message)?;
            pda::users_page(config, page_id)?
        }
        "asset-pool" => pda::asset_pool(config, pool()?.0)?,
        "asset-pool-spl" => pda::asset_pool_spl(config, pool()?.0)?,
        "asset-price" => pda::asset_price(config, pool()?.0)?,
        "price" => {
            let (pool_id, mint) = pool()?;
            let has_feed = config
                .pools
                .get_by_pool_id(pool_id)
                .is_some_and(|entry| entry.pyth_price.is_some());
            if config.price_source == PriceSource::Pyth && !has_feed {
                warn!("pool {} has no pyth feed, use --pyth-feed to register one", pool_id);
            }
            pda::price_key(config, &mint)?
        }
        "user-info" => {
            let wallet = matches.value_of("wallet").ok_or("--wallet is required")?;
            pda::user_info(config, &parse_pubkey(wallet)?)?
        }
        _ => return Err(format!("unknown address kind {:?}", kind).into()),
    };
    println!("{}", address);
    Ok(())
}

fn command_pools(config: &ProtocolConfig) -> CliResult<()> {
    for entry in config.pools.entries() {
        println!(
            "{:>3} {:<5} {} {} {}",
            entry.pool_id,
            entry.symbol,
            pda::pool_seed(entry.pool_id),
            entry.mint,
            pda::asset_pool(config, entry.pool_id)?,
        );
    }
    Ok(())
}

fn command_decode(matches: &ArgMatches) -> CliResult<()> {
    let shape: AccountShape = matches.value_of("shape").unwrap_or_default().parse()?;
    let data = match (matches.value_of("file"), matches.value_of("data")) {
        (Some(path), _) => fs::read(path)?,
        (None, Some("-")) => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            data
        }
        (None, Some(data)) if matches.is_present("base64") => STANDARD.decode(data.trim())?,
        (None, Some(data)) => hex::decode(data.trim().trim_start_matches("0x"))?,
        (None, None) => return Err("no account data given".into()),
    };
    info!("decoding {} bytes as {}", data.len(), shape);
    println!("{:#?}", decode(shape, &data)?);
    Ok(())
}

fn command_instruction(matches: &ArgMatches) -> CliResult<()> {
    let data = matches.value_of("data").unwrap_or_default();
    let data = hex::decode(data.trim().trim_start_matches("0x"))?;
    let instruction = LendingInstruction::unpack(&data)?;
    println!("{:?} (opcode {:#04x})", instruction.opcode(), data[0]);
    println!("{:#?}", instruction);
    Ok(())
}

fn command_market_vault(config: &ProtocolConfig, matches: &ArgMatches) -> CliResult<()> {
    let max_attempts = match matches.value_of("max_attempts") {
        Some(value) => Some(value.parse::<usize>()?),
        None => None,
    };
    let (market, vault) = pda::find_market_vault(&config.serum_program_id, max_attempts)?;
    println!("market: {}", market.pubkey());
    println!("vault signer: {}", vault);
    println!("market keypair: {:?}", market.to_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_pyth_feed() {
        let mut config = ProtocolConfig::devnet().with_price_source(PriceSource::Pyth);
        let btc = config.pools.get_by_symbol("BTC").unwrap().mint;
        let protocol_price = pda::asset_price(&config, 0).unwrap();
        assert_eq!(pda::price_key(&config, &btc).unwrap(), protocol_price);

        let feed = Pubkey::new_unique();
        add_pyth_feed(&mut config, &format!("BTC={}", feed)).unwrap();
        assert_eq!(pda::price_key(&config, &btc).unwrap(), feed);

        assert!(add_pyth_feed(&mut config, "BTC").is_err());
        assert!(add_pyth_feed(&mut config, "DOGE=11111111111111111111111111111111").is_err());
        assert!(add_pyth_feed(&mut config, "ETH=not-a-key").is_err());
    }
}
