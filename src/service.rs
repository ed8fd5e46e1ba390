// Analytics service - the operations behind every API endpoint
//
// Rankings are recomputed from the data file and cached for `ttl`.
// A request with refresh = true skips the cache and recomputes.
// Generation appends a batch to the data file under a write lock.

use chrono::Local;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::analytics::{top_categories, top_cities, top_merchants, TOP_N};
use crate::cache::TtlCache;
use crate::format::format_duration;
use crate::models::{
    CategoriaFaturamento, CidadeFaturamento, Comercio, GerarDadosResponse, LegacyTopResponse,
    TopCategoriasResponse, TopCidadesResponse, TopComerciosResponse, FONTE_AO_VIVO, FONTE_CACHE,
};
use crate::store::{MerchantStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Envelope metadata written on every response
trait Envelope: Clone {
    fn stamp(&mut self, fonte: &str, tempo: String);
}

impl Envelope for TopComerciosResponse {
    fn stamp(&mut self, fonte: &str, tempo: String) {
        self.fonte_dados = fonte.to_string();
        self.tempo_processamento = tempo;
    }
}

impl Envelope for TopCidadesResponse {
    fn stamp(&mut self, fonte: &str, tempo: String) {
        self.fonte_dados = fonte.to_string();
        self.tempo_processamento = tempo;
    }
}

impl Envelope for TopCategoriasResponse {
    fn stamp(&mut self, fonte: &str, tempo: String) {
        self.fonte_dados = fonte.to_string();
        self.tempo_processamento = tempo;
    }
}

pub struct AnalyticsService {
    store: MerchantStore,
    batch_size: usize,
    merchants: TtlCache<TopComerciosResponse>,
    cities: TtlCache<TopCidadesResponse>,
    categories: TtlCache<TopCategoriasResponse>,
    write_lock: Mutex<()>,
}

impl AnalyticsService {
    pub fn new(store: MerchantStore, cache_ttl: Duration, batch_size: usize) -> Self {
        Self {
            store,
            batch_size,
            merchants: TtlCache::new(cache_ttl),
            cities: TtlCache::new(cache_ttl),
            categories: TtlCache::new(cache_ttl),
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &MerchantStore {
        &self.store
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Write an initial data file (one batch) when none exists
    pub fn ensure_seeded(&self) -> Result<bool, ServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let seeded =
            self.store
                .ensure_seeded(self.batch_size, &mut rand::rng(), Local::now().date_naive())?;
        if seeded {
            info!(path = %self.store.path().display(), records = self.batch_size, "data file created");
        }
        Ok(seeded)
    }

    // ========================================================================
    // RANKINGS
    // ========================================================================

    pub fn top_merchants(&self, refresh: bool) -> Result<TopComerciosResponse, ServiceError> {
        self.serve(&self.merchants, refresh, "/top10-faturamento", |comercios| {
            TopComerciosResponse {
                top_10_comercios: top_merchants(comercios, TOP_N),
                tempo_processamento: String::new(),
                fonte_dados: String::new(),
            }
        })
    }

    pub fn top_cities(&self, refresh: bool) -> Result<TopCidadesResponse, ServiceError> {
        self.serve(&self.cities, refresh, "/top10-cidades", |comercios| {
            TopCidadesResponse {
                top_10_cidades: top_cities(comercios, TOP_N)
                    .into_iter()
                    .map(|total| CidadeFaturamento {
                        cidade: total.name,
                        faturamento: total.faturamento.into(),
                    })
                    .collect(),
                tempo_processamento: String::new(),
                fonte_dados: String::new(),
            }
        })
    }

    pub fn top_categories(&self, refresh: bool) -> Result<TopCategoriasResponse, ServiceError> {
        self.serve(&self.categories, refresh, "/top10-categorias", |comercios| {
            TopCategoriasResponse {
                top_10_categorias: top_categories(comercios, TOP_N)
                    .into_iter()
                    .map(|total| CategoriaFaturamento {
                        categoria: total.name,
                        faturamento: total.faturamento.into(),
                    })
                    .collect(),
                tempo_processamento: String::new(),
                fonte_dados: String::new(),
            }
        })
    }

    /// Uncached merchant ranking for the legacy `/top10` route
    pub fn legacy_top10(&self) -> Result<LegacyTopResponse, ServiceError> {
        let inicio = Instant::now();
        let comercios = self.store.load()?;
        let top = top_merchants(&comercios, TOP_N);

        Ok(LegacyTopResponse {
            top_10_comercios: top,
            tempo_processamento: format_duration(inicio.elapsed()),
        })
    }

    fn serve<T, F>(
        &self,
        cache: &TtlCache<T>,
        refresh: bool,
        endpoint: &'static str,
        compute: F,
    ) -> Result<T, ServiceError>
    where
        T: Envelope,
        F: FnOnce(&[Comercio]) -> T,
    {
        let inicio = Instant::now();

        if !refresh {
            if let Some(mut cached) = cache.get_fresh() {
                cached.stamp(FONTE_CACHE, format_duration(inicio.elapsed()));
                debug!(endpoint, "serving from cache");
                return Ok(cached);
            }
        }

        info!(endpoint, refresh, "cache stale or refresh requested, recomputing");
        let comercios = self.store.load()?;
        let mut resposta = compute(&comercios);
        resposta.stamp(FONTE_AO_VIVO, format_duration(inicio.elapsed()));

        cache.put(resposta.clone());
        Ok(resposta)
    }

    // ========================================================================
    // GENERATION
    // ========================================================================

    /// Append one batch of generated merchants to the data file
    ///
    /// Ranking caches are left alone; callers refresh to see new data.
    pub fn generate(&self) -> Result<GerarDadosResponse, ServiceError> {
        let inicio = Instant::now();
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let total = self.store.append_generated(
            self.batch_size,
            &mut rand::rng(),
            Local::now().date_naive(),
        )?;
        let tempo = format_duration(inicio.elapsed());
        info!(added = self.batch_size, total, elapsed = %tempo, "generated merchant batch");

        Ok(GerarDadosResponse {
            mensagem: format!("{} novos registros adicionados com sucesso!", self.batch_size),
            tempo_processamento: tempo,
            registros_gerados: total as u64,
        })
    }
}
