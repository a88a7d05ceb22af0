#![no_std]

// Cross-chain escrow factory: deploys one escrow contract per swap and
// tracks partial fills of multi-tranche orders.

use shared::{
    baseescrow::INSTANCE_BUMP_AMOUNT, baseescrow::INSTANCE_LIFETIME_THRESHOLD, extend_instance_ttl,
    hashlock, immutables::immutables, timelocks, Error, Immutables, Stage, Timelocks,
};
use soroban_sdk::{
    contract, contractimpl, contracttype, log, symbol_short, xdr::ToXdr, Address, Bytes, BytesN, Env, Symbol,
};

pub mod merkle_invalidator;
pub mod types;

pub use merkle_invalidator::MerkleLeaf;
pub use types::*;

#[contract]
pub struct EscrowFactory;

// Storage keys for factory configuration
const OWNER: Symbol = symbol_short!("owner");
const SRC_HASH: Symbol = symbol_short!("src_hash");
const DST_HASH: Symbol = symbol_short!("dst_hash");
const COUNTERPART: Symbol = symbol_short!("cpart");

// Storage key type for deployed escrows
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EscrowDataKey {
    Escrow(Address),
}

#[contractimpl]
impl EscrowFactory {
    /// Initialize factory with owner, escrow code identities and the factory
    /// on the other ledger
    pub fn __constructor(
        env: Env,
        owner: Address,
        src_escrow_wasm_hash: BytesN<32>,
        dst_escrow_wasm_hash: BytesN<32>,
        counterpart_factory: Address,
    ) {
        let storage = env.storage().instance();
        storage.set(&OWNER, &owner);
        storage.set(&SRC_HASH, &src_escrow_wasm_hash);
        storage.set(&DST_HASH, &dst_escrow_wasm_hash);
        storage.set(&COUNTERPART, &counterpart_factory);
        storage.extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    /// Create the source chain escrow for a (possibly partial) fill of `order`.
    ///
    /// The deployed escrow pulls `making_amount` of the maker asset from the
    /// maker in its constructor, so deployment and funding abort together.
    #[allow(clippy::too_many_arguments)]
    pub fn create_src_escrow(
        env: Env,
        order: Order,
        extension: Bytes,
        order_hash: BytesN<32>,
        taker: Address,
        making_amount: i128,
        taking_amount: i128,
        remaining_making_amount: i128,
        extra_data: ExtraDataArgs,
    ) -> Result<Address, Error> {
        order.maker.require_auth();
        taker.require_auth();

        if Self::hash_order(env.clone(), order.clone(), extension) != order_hash {
            return Err(Error::InvalidOrderHash);
        }
        if making_amount <= 0
            || making_amount > remaining_making_amount
            || remaining_making_amount > order.making_amount
        {
            return Err(Error::InvalidPartialFill);
        }

        // Every fill moves the watermark. A full fill is only accepted on an
        // untouched key and then blocks any later tranche.
        let hashlock = extra_data.hashlock_info.clone();
        let key = merkle_invalidator::tranche_key(&env, &order_hash, &hashlock);
        let partial = making_amount < order.making_amount;
        if partial && extra_data.parts_amount < 2 {
            return Err(Error::InvalidPartialFill);
        }
        if !partial && merkle_invalidator::last_validated(&env, &key).amount != 0 {
            return Err(Error::InvalidMerkleProof);
        }
        let leaf = MerkleLeaf {
            leaf_hash: merkle_invalidator::leaf_hash(&env, &hashlock),
            amount: making_amount,
        };
        merkle_invalidator::accept(&env, &key, &leaf)?;

        let timelocks = extra_data
            .timelocks
            .with_deployed_at(env.ledger().timestamp());
        timelocks::validate(&timelocks)?;

        let immutables = Immutables {
            order_hash: order_hash.clone(),
            hashlock: hashlock.clone(),
            maker: order.maker.clone(),
            taker,
            token: order.maker_asset.clone(),
            amount: making_amount,
            timelocks,
            src_factory: env.current_contract_address(),
            dst_factory: Self::counterpart_factory(env.clone())?,
        };

        let salt = Self::src_salt(
            env.clone(),
            order_hash.clone(),
            hashlock,
            making_amount,
            order.making_amount,
        );
        let escrow = deploy_escrow(&env, EscrowKind::Source, &salt, &immutables)?;

        log!(&env, "src escrow created: amount={}", making_amount);
        env.events().publish(
            (Symbol::new(&env, "src_escrow_created"), order_hash),
            SrcEscrowCreated {
                escrow: escrow.clone(),
                immutables,
                dst_complement: DstImmutablesComplement {
                    maker: order.receiver,
                    amount: taking_amount,
                    token: extra_data.dst_token,
                    chain_id: extra_data.dst_chain_id,
                },
            },
        );
        Ok(escrow)
    }

    /// Create the destination chain escrow. `deployed_at` is stamped with the
    /// current ledger time before any check.
    pub fn create_dst_escrow(
        env: Env,
        hashlock: BytesN<32>,
        taker: Address,
        immutables: Immutables,
    ) -> Result<Address, Error> {
        immutables.maker.require_auth();

        let immutables = Immutables {
            timelocks: immutables
                .timelocks
                .with_deployed_at(env.ledger().timestamp()),
            ..immutables
        };
        ensure_dst_cancels_first(&immutables.timelocks)?;
        timelocks::validate(&immutables.timelocks)?;
        immutables::validate_amounts(&immutables)?;

        if immutables.hashlock != hashlock
            || immutables.taker != taker
            || immutables.dst_factory != env.current_contract_address()
        {
            return Err(Error::InvalidImmutables);
        }

        let salt = Self::dst_salt(env.clone(), hashlock.clone(), taker.clone());
        let escrow = deploy_escrow(&env, EscrowKind::Destination, &salt, &immutables)?;

        log!(&env, "dst escrow created: amount={}", immutables.amount);
        env.events().publish(
            (Symbol::new(&env, "dst_escrow_created"), hashlock.clone()),
            DstEscrowCreated {
                escrow: escrow.clone(),
                hashlock,
                taker,
            },
        );
        Ok(escrow)
    }

    /// Address an escrow of code `class_hash` deployed with `salt` lands on.
    /// Deployment goes through the same derivation.
    pub fn get_escrow_address(env: Env, class_hash: BytesN<32>, salt: BytesN<32>) -> Address {
        env.deployer()
            .with_current_contract(deployment_salt(&env, &class_hash, &salt))
            .deployed_address()
    }

    /// `order_hash` for a full fill, keccak256(tranche key ‖ amount) for a
    /// partial one, so every accepted tranche gets its own address.
    pub fn src_salt(
        env: Env,
        order_hash: BytesN<32>,
        hashlock: BytesN<32>,
        making_amount: i128,
        order_making_amount: i128,
    ) -> BytesN<32> {
        if making_amount >= order_making_amount {
            return order_hash;
        }
        let key = merkle_invalidator::tranche_key(&env, &order_hash, &hashlock);
        let mut bytes = Bytes::from_array(&env, &key.to_array());
        bytes.extend_from_array(&making_amount.to_be_bytes());
        env.crypto().keccak256(&bytes).into()
    }

    /// keccak256(hashlock ‖ xdr(taker))
    pub fn dst_salt(env: Env, hashlock: BytesN<32>, taker: Address) -> BytesN<32> {
        let mut bytes = Bytes::from_array(&env, &hashlock.to_array());
        bytes.append(&taker.to_xdr(&env));
        env.crypto().keccak256(&bytes).into()
    }

    /// keccak256(xdr(order) ‖ extension)
    pub fn hash_order(env: Env, order: Order, extension: Bytes) -> BytesN<32> {
        let mut bytes = order.to_xdr(&env);
        bytes.append(&extension);
        env.crypto().keccak256(&bytes).into()
    }

    pub fn generate_hashlock(env: Env, secret: BytesN<32>) -> BytesN<32> {
        hashlock::commit(&env, &secret)
    }

    pub fn tranche_key(env: Env, order_hash: BytesN<32>, hashlock: BytesN<32>) -> BytesN<32> {
        merkle_invalidator::tranche_key(&env, &order_hash, &hashlock)
    }

    pub fn get_last_validated(env: Env, key: BytesN<32>) -> MerkleLeaf {
        merkle_invalidator::last_validated(&env, &key)
    }

    pub fn is_leaf_valid(env: Env, key: BytesN<32>, leaf: MerkleLeaf) -> bool {
        merkle_invalidator::is_valid(&env, &key, &leaf)
    }

    pub fn escrow_kind(env: Env, escrow: Address) -> Option<EscrowKind> {
        env.storage().persistent().get(&EscrowDataKey::Escrow(escrow))
    }

    // Admin functions
    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage().instance().get(&OWNER).ok_or(Error::Unauthorized)
    }

    pub fn counterpart_factory(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&COUNTERPART)
            .ok_or(Error::InvalidImmutables)
    }

    pub fn get_src_escrow_class_hash(env: Env) -> Result<BytesN<32>, Error> {
        class_hash(&env, EscrowKind::Source)
    }

    pub fn get_dst_escrow_class_hash(env: Env) -> Result<BytesN<32>, Error> {
        class_hash(&env, EscrowKind::Destination)
    }
}

// Helper functions

/// The destination side must become cancellable no later than the source
/// side. Both are measured from the same `deployed_at`.
pub fn ensure_dst_cancels_first(timelocks: &Timelocks) -> Result<(), Error> {
    let dst_cancellation = timelocks::stage_time(timelocks, Stage::DstCancellation)?;
    let src_cancellation = timelocks::stage_time(timelocks, Stage::SrcCancellation)?;
    if dst_cancellation > src_cancellation {
        return Err(Error::InvalidCreationTime);
    }
    Ok(())
}

fn class_hash(env: &Env, kind: EscrowKind) -> Result<BytesN<32>, Error> {
    let key = match kind {
        EscrowKind::Source => SRC_HASH,
        EscrowKind::Destination => DST_HASH,
    };
    env.storage()
        .instance()
        .get(&key)
        .ok_or(Error::DeploymentFailed)
}

/// keccak256(class_hash ‖ salt): binds the address to the escrow code as
/// well as to the caller-visible salt.
fn deployment_salt(env: &Env, class_hash: &BytesN<32>, salt: &BytesN<32>) -> BytesN<32> {
    let mut bytes = Bytes::from_array(env, &class_hash.to_array());
    bytes.extend_from_array(&salt.to_array());
    env.crypto().keccak256(&bytes).into()
}

fn deploy_escrow(
    env: &Env,
    kind: EscrowKind,
    salt: &BytesN<32>,
    immutables: &Immutables,
) -> Result<Address, Error> {
    let class_hash = class_hash(env, kind)?;
    let address = EscrowFactory::get_escrow_address(env.clone(), class_hash.clone(), salt.clone());
    let record = EscrowDataKey::Escrow(address.clone());
    if env.storage().persistent().has(&record) {
        return Err(Error::DeploymentFailed);
    }

    let owner = EscrowFactory::owner(env.clone())?;
    let deployed = env
        .deployer()
        .with_current_contract(deployment_salt(env, &class_hash, salt))
        .deploy_v2(class_hash, (immutables.clone(), owner));
    if deployed != address {
        return Err(Error::DeploymentFailed);
    }

    env.storage().persistent().set(&record, &kind);
    env.storage().persistent().extend_ttl(
        &record,
        merkle_invalidator::PERSISTENT_LIFETIME_THRESHOLD,
        merkle_invalidator::PERSISTENT_BUMP_AMOUNT,
    );
    extend_instance_ttl(env);
    Ok(address)
}
