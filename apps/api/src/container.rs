use std::sync::Arc;

use appointment_cell::{
    AddAppointmentUseCase, AppointmentCompletedUseCase, AppointmentService, AppointmentState,
    SupabaseAppointmentHistoryRepository, SupabaseAppointmentRepository,
};
use auth_cell::{AuthService, AuthState, SupabaseUserRepository, UserService};
use dialysis_cell::{CreateSessionUseCase, DialysisService, DialysisState, SupabaseDialysisRepository};
use doctor_cell::{DoctorService, DoctorState, SupabaseDoctorRepository};
use facility_cell::{
    FacilityState, MachineService, RoomRepository, RoomService, SupabaseMachineRepository, SupabaseRoomRepository,
};
use medical_file_cell::{MedicalFileService, MedicalFileState, SupabaseMedicalFileRepository};
use patient_cell::{PatientService, PatientState, SupabasePatientRepository};
use prescription_cell::{PrescriptionService, PrescriptionState, SupabasePrescriptionRepository};
use receptionist_cell::{ReceptionistService, ReceptionistState, SupabaseReceptionistRepository};
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use stats_cell::{GetDashboardStatsUseCase, StatsService, StatsState, SupabaseStatsRepository};

/// Every repository and service, built once at start-up and shared by the
/// routers through their cell state.
pub struct AppContainer {
    pub auth: Arc<AuthState>,
    pub doctors: Arc<DoctorState>,
    pub receptionists: Arc<ReceptionistState>,
    pub patients: Arc<PatientState>,
    pub medical_files: Arc<MedicalFileState>,
    pub facility: Arc<FacilityState>,
    pub appointments: Arc<AppointmentState>,
    pub dialysis: Arc<DialysisState>,
    pub prescriptions: Arc<PrescriptionState>,
    pub stats: Arc<StatsState>,
}

impl AppContainer {
    pub fn build(config: AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(&config));
        let config = Arc::new(config);

        let users = Arc::new(SupabaseUserRepository::new(supabase.clone()));
        let doctors = Arc::new(SupabaseDoctorRepository::new(supabase.clone()));
        let receptionists = Arc::new(SupabaseReceptionistRepository::new(supabase.clone()));
        let patients = Arc::new(SupabasePatientRepository::new(supabase.clone()));
        let files = Arc::new(SupabaseMedicalFileRepository::new(supabase.clone()));
        let rooms = Arc::new(SupabaseRoomRepository::new(supabase.clone()));
        let machines = Arc::new(SupabaseMachineRepository::new(supabase.clone()));
        let appointments = Arc::new(SupabaseAppointmentRepository::new(supabase.clone()));
        let history = Arc::new(SupabaseAppointmentHistoryRepository::new(supabase.clone()));
        let dialysis = Arc::new(SupabaseDialysisRepository::new(supabase.clone()));
        let prescriptions = Arc::new(SupabasePrescriptionRepository::new(supabase.clone()));
        let stats = Arc::new(SupabaseStatsRepository::new(supabase));

        let medical_file_service = Arc::new(MedicalFileService::new(files.clone(), patients.clone()));

        Self {
            auth: Arc::new(AuthState {
                config: config.clone(),
                auth: AuthService::new(users.clone()),
                users: UserService::new(users.clone()),
            }),
            doctors: Arc::new(DoctorState {
                config: config.clone(),
                doctors: DoctorService::new(doctors, users.clone()),
            }),
            receptionists: Arc::new(ReceptionistState {
                config: config.clone(),
                receptionists: ReceptionistService::new(receptionists, users),
            }),
            patients: Arc::new(PatientState {
                config: config.clone(),
                patients: PatientService::new(patients.clone()),
            }),
            medical_files: Arc::new(MedicalFileState {
                config: config.clone(),
                files: medical_file_service.clone(),
            }),
            facility: Arc::new(FacilityState {
                config: config.clone(),
                rooms: RoomService::new(rooms.clone()),
                machines: MachineService::new(machines.clone()),
            }),
            appointments: Arc::new(AppointmentState {
                config: config.clone(),
                appointments: AppointmentService::new(
                    appointments.clone(),
                    history.clone(),
                    AddAppointmentUseCase::new(appointments, Some(rooms as Arc<dyn RoomRepository>)),
                    AppointmentCompletedUseCase::new(files, patients.clone(), history),
                ),
            }),
            dialysis: Arc::new(DialysisState {
                config: config.clone(),
                dialysis: DialysisService::new(dialysis.clone(), dialysis.clone(), dialysis.clone(), patients.clone()),
                create_session: CreateSessionUseCase::new(dialysis.clone(), dialysis, medical_file_service),
            }),
            prescriptions: Arc::new(PrescriptionState {
                config: config.clone(),
                prescriptions: PrescriptionService::new(prescriptions, patients),
            }),
            stats: Arc::new(StatsState {
                config,
                dashboard: GetDashboardStatsUseCase::new(stats.clone(), machines),
                stats: StatsService::new(stats),
            }),
        }
    }
}
